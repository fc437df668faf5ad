//! Game state, rules and turn structure

pub mod cards;
pub mod combat;
pub mod config;
pub mod effects;
pub mod game_loop;
pub mod heuristic_controller;
pub mod logger;
pub mod outcome;
pub mod phase;
pub mod state;
pub mod status;
pub mod traps;
pub mod turn;
pub mod view;

#[cfg(test)]
pub(crate) mod test_util;

pub use config::{ControllerKind, GameConfig};
pub use effects::{
    EffectRegistry, FieldEffect, ImmediateEffect, TargetClass, TargetedAction, TechniqueEffect,
    TrapDefinition, TrapEffect, TriggerEvent, TriggerType,
};
pub use game_loop::{GameEndReason, GameLoop, GameResult, VerbosityLevel};
pub use heuristic_controller::{
    CombatSegment, HeuristicController, SCORE_CHIP, SCORE_CLEAN_KILL, SCORE_MUTUAL, SCORE_SUICIDE,
};
pub use logger::{GameLogger, LogEntry, OutputMode};
pub use outcome::{
    ActionOutcome, CombatReport, ErrorCategory, PendingAttack, PendingPierce, PendingTechnique,
    TrapPrompt,
};
pub use phase::Phase;
pub use state::GameState;
pub use status::{StatusEffectEngine, UnitStats};
pub use traps::TrapMatch;
pub use view::{GameView, OpponentView, OwnView, UnitView};
