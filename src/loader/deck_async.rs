//! Async deck loading utilities
//!
//! Reads deck files off the runtime's blocking pool so a host serving many
//! games never parses on an async worker.

use crate::loader::deck::{DeckList, DeckLoader};
use crate::Result;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Load one deck file
pub async fn load_deck_async(path: &Path) -> Result<DeckList> {
    let content = tokio::fs::read_to_string(path).await?;
    tokio::task::spawn_blocking(move || DeckLoader::parse(&content)).await?
}

/// Load both seats' decks concurrently
/// Returns (decks, duration)
pub async fn load_deck_pair(first: PathBuf, second: PathBuf) -> Result<([DeckList; 2], Duration)> {
    let start = Instant::now();
    let (a, b) = tokio::join!(load_deck_async(&first), load_deck_async(&second));
    Ok(([a?, b?], start.elapsed()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_bundled_decks() {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("decks");
        let ([sky, miasma], _) = load_deck_pair(root.join("skyforge.deck"), root.join("miasma.deck"))
            .await
            .unwrap();
        assert_eq!(sky.total_cards(), 42);
        assert_eq!(miasma.name, "Miasma");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let result = load_deck_async(Path::new("decks/does_not_exist.deck")).await;
        assert!(matches!(result, Err(crate::SanctumError::IoError(_))));
    }
}
