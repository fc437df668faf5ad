//! Error types for Sanctum Forge
//!
//! These cover infrastructure faults only. Rule violations during play are
//! reported through [`crate::game::ActionOutcome`] and never surface as `Err`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SanctumError {
    #[error("Invalid card catalog: {0}")]
    InvalidCatalog(String),

    #[error("Invalid deck format: {0}")]
    InvalidDeckFormat(String),

    #[error("Unknown card id: {0}")]
    UnknownCard(String),

    #[error("Unknown faction: {0}")]
    UnknownFaction(String),

    #[error("Game not found: {0}")]
    GameNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, SanctumError>;
