//! Tagged results of game operations
//!
//! Rule violations are ordinary values here. Nothing a player can request
//! turns into an `Err` or a panic.

use crate::core::{CardId, PlayerId};
use crate::game::TargetClass;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Why an action was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Unknown game, empty slot, card not in hand
    NotFound,
    /// Not enough energy, no free slot
    Resource,
    /// SPD, Guard, first-turn attack, wrong player or phase
    Legality,
    /// A pending discard, destroy or prompt must be answered first
    StateConflict,
}

/// Result of one game operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ActionOutcome {
    Success {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        combat: Option<CombatReport>,
    },
    Error {
        category: ErrorCategory,
        reason: String,
    },
    /// A targeted technique was paid for; a target must be supplied next
    NeedsTarget { card_id: CardId, target: TargetClass },
    /// An attack is paused until the defender answers the trap prompt
    TrapInterrupt(TrapPrompt),
    /// The game has a winner; nothing was changed
    GameOver { winner: PlayerId },
}

impl ActionOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        ActionOutcome::Success {
            message: message.into(),
            combat: None,
        }
    }

    pub fn combat(message: impl Into<String>, report: CombatReport) -> Self {
        ActionOutcome::Success {
            message: message.into(),
            combat: Some(report),
        }
    }

    pub fn error(category: ErrorCategory, reason: impl Into<String>) -> Self {
        ActionOutcome::Error {
            category,
            reason: reason.into(),
        }
    }

    pub fn not_found(reason: impl Into<String>) -> Self {
        Self::error(ErrorCategory::NotFound, reason)
    }

    pub fn resource(reason: impl Into<String>) -> Self {
        Self::error(ErrorCategory::Resource, reason)
    }

    pub fn illegal(reason: impl Into<String>) -> Self {
        Self::error(ErrorCategory::Legality, reason)
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::error(ErrorCategory::StateConflict, reason)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Success { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ActionOutcome::Error { .. })
    }

    /// The error category, if this is an error
    pub fn error_category(&self) -> Option<ErrorCategory> {
        match self {
            ActionOutcome::Error { category, .. } => Some(*category),
            _ => None,
        }
    }

    /// The combat report, if this outcome resolved an attack
    pub fn combat_report(&self) -> Option<&CombatReport> {
        match self {
            ActionOutcome::Success { combat, .. } => combat.as_ref(),
            _ => None,
        }
    }
}

/// What happened during one resolved attack
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatReport {
    pub log: Vec<String>,
    pub attacker_destroyed: bool,
    pub defender_destroyed: bool,
    pub pierce_available: bool,
    pub pierce_damage: i32,
}

/// A declared attack waiting on trap responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAttack {
    pub attacker_player: PlayerId,
    pub attacker_slot: usize,
    pub defender_slot: usize,
    /// Trap slot the defender must currently answer for
    pub awaiting: Option<usize>,
    /// Trap slots already declined for this declaration
    pub declined: SmallVec<[usize; 3]>,
}

impl PendingAttack {
    pub fn new(attacker_player: PlayerId, attacker_slot: usize, defender_slot: usize) -> Self {
        PendingAttack {
            attacker_player,
            attacker_slot,
            defender_slot,
            awaiting: None,
            declined: SmallVec::new(),
        }
    }

    pub fn matches(&self, player: PlayerId, attacker_slot: usize, defender_slot: usize) -> bool {
        self.attacker_player == player
            && self.attacker_slot == attacker_slot
            && self.defender_slot == defender_slot
    }
}

/// Prompt sent to the defender when a trap can answer an attack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrapPrompt {
    pub defender: PlayerId,
    pub trap_slot: usize,
    pub trap: CardId,
    pub trap_name: String,
    pub cost: i32,
    pub trigger_message: String,
    pub pending_attack: PendingAttack,
}

/// A paid targeted technique waiting for its target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTechnique {
    pub player: PlayerId,
    pub card_id: CardId,
    pub target: TargetClass,
}

/// Pierce overflow the attacker may still assign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPierce {
    pub attacker_player: PlayerId,
    pub damage: i32,
}
