//! Sanctum Forge - rules engine for The Seventh Sanctum card game
//!
//! Two players deploy units, fields, traps and techniques onto a five-slot
//! battlefield and fight until one of them runs out of cards or loses
//! control of the board. The engine is deterministic for a given seed and
//! drives a heuristic opponent inline during phase advancement.

pub mod core;
pub mod error;
pub mod game;
pub mod loader;
pub mod simulation;
pub mod store;

pub use error::{Result, SanctumError};
