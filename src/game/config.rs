//! Rules constants and per-seat controller configuration

use crate::core::PlayerId;
use crate::game::VerbosityLevel;
use serde::{Deserialize, Serialize};

/// Who makes decisions for a seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControllerKind {
    /// Actions arrive from outside; blocking prompts wait for them
    Human,
    /// The heuristic AI acts inline during phase advancement
    Heuristic,
}

/// Tunable rules values for one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub starting_energy: i32,
    pub energy_per_turn: i32,
    /// Energy is clamped to this value when a turn ends
    pub energy_cap: i32,
    pub starting_hand: usize,
    pub hand_limit: usize,
    /// Consecutive empty-board turn ends that lose the game
    pub control_loss_limit: u32,
    /// Log entries included in a player view
    pub log_tail: usize,
    pub controllers: [ControllerKind; 2],
    pub verbosity: VerbosityLevel,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            starting_energy: 5,
            energy_per_turn: 2,
            energy_cap: 5,
            starting_hand: 5,
            hand_limit: 7,
            control_loss_limit: 3,
            log_tail: 10,
            controllers: [ControllerKind::Human, ControllerKind::Heuristic],
            verbosity: VerbosityLevel::Silent,
        }
    }
}

impl GameConfig {
    /// Both seats played by the heuristic AI
    pub fn ai_vs_ai() -> Self {
        GameConfig {
            controllers: [ControllerKind::Heuristic, ControllerKind::Heuristic],
            ..Self::default()
        }
    }

    /// Both seats driven externally; used by rules tests
    pub fn human_vs_human() -> Self {
        GameConfig {
            controllers: [ControllerKind::Human, ControllerKind::Human],
            ..Self::default()
        }
    }

    pub fn with_controller(mut self, player: PlayerId, kind: ControllerKind) -> Self {
        self.controllers[player.index()] = kind;
        self
    }

    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_hand_limit(mut self, hand_limit: usize) -> Self {
        self.hand_limit = hand_limit;
        self
    }

    pub fn controller(&self, player: PlayerId) -> ControllerKind {
        self.controllers[player.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"hand_limit": 6}"#).unwrap();
        assert_eq!(config.hand_limit, 6);
        assert_eq!(config.energy_cap, 5);
        assert_eq!(config.controller(PlayerId::SECOND), ControllerKind::Heuristic);
    }
}
