//! Game loop implementation
//!
//! Drives a game by repeatedly advancing phases. AI seats act inside
//! `advance`, so a loop over two heuristic seats plays a complete game. A
//! human seat stops the loop as soon as the engine waits on it.

use crate::core::PlayerId;
use crate::game::{ActionOutcome, GameState};
use serde::{Deserialize, Serialize};

/// Verbosity level for game output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Silent - no output during game
    Silent = 0,
    /// Minimal - only game outcome
    Minimal = 1,
    /// Normal - turns and key actions (default)
    #[default]
    Normal = 2,
    /// Verbose - also AI scoring and trap scans
    Verbose = 3,
}

/// Reason the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "loser", rename_all = "snake_case")]
pub enum GameEndReason {
    /// The player could not draw a required card
    Decking(PlayerId),
    /// The player ended too many turns with an empty battlefield
    ControlLoss(PlayerId),
    /// Game reached maximum turn limit
    TurnLimit,
    /// The loop stopped early, waiting on a human seat or a turn budget
    Manual,
}

/// Result of running a game loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameResult {
    /// Winner of the game (None if it did not finish)
    pub winner: Option<PlayerId>,
    /// Shared turn number when the loop stopped
    pub turns_played: u32,
    pub end_reason: GameEndReason,
}

/// Game loop manager
pub struct GameLoop<'a> {
    /// The game state
    pub game: &'a mut GameState,
    /// Maximum turns before stopping with `TurnLimit`
    max_turns: u32,
    /// Verbosity level for output (cached from game.logger)
    pub verbosity: VerbosityLevel,
}

impl<'a> GameLoop<'a> {
    pub fn new(game: &'a mut GameState) -> Self {
        let verbosity = game.logger.verbosity();
        GameLoop {
            game,
            max_turns: 200,
            verbosity,
        }
    }

    /// Set maximum turns before the game is cut off
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Set verbosity on both the loop and the game's logger
    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.verbosity = verbosity;
        self.game.logger.set_verbosity(verbosity);
        self
    }

    /// Advance until the game ends, the turn limit is hit, or a human must act
    pub fn run_game(&mut self) -> GameResult {
        loop {
            if let Some(result) = self.step() {
                return result;
            }
        }
    }

    /// Run at most `turns_to_run` more full turns
    ///
    /// Returns `Manual` if the budget ran out before the game ended.
    pub fn run_turns(&mut self, turns_to_run: u32) -> GameResult {
        let stop_at = self.game.turn.saturating_add(turns_to_run);
        while self.game.turn < stop_at {
            if let Some(result) = self.step() {
                return result;
            }
        }
        self.result(GameEndReason::Manual)
    }

    /// One `advance`; `Some` once the loop has to stop
    fn step(&mut self) -> Option<GameResult> {
        if let Some(reason) = self.game.end_reason.filter(|_| self.game.is_over()) {
            return Some(self.result(reason));
        }
        if self.game.turn > self.max_turns {
            if self.verbosity >= VerbosityLevel::Minimal {
                println!("Turn limit of {} reached", self.max_turns);
            }
            return Some(self.result(GameEndReason::TurnLimit));
        }

        match self.game.advance() {
            ActionOutcome::GameOver { .. } => {
                let reason = self.game.end_reason.unwrap_or(GameEndReason::Manual);
                Some(self.result(reason))
            }
            ActionOutcome::Success { .. } => None,
            ActionOutcome::Error { reason, .. } => {
                self.game.debug(format!("Loop stopped: {reason}"));
                Some(self.result(GameEndReason::Manual))
            }
            ActionOutcome::NeedsTarget { .. } | ActionOutcome::TrapInterrupt(_) => {
                Some(self.result(GameEndReason::Manual))
            }
        }
    }

    fn result(&self, end_reason: GameEndReason) -> GameResult {
        GameResult {
            winner: self.game.winner,
            turns_played: self.game.turn,
            end_reason,
        }
    }
}
