//! Card catalog for looking up card definitions
//!
//! The catalog is a static JSON dataset keyed by card id. It is loaded once,
//! wrapped in an `Arc` and shared read-only by every game.

use crate::core::{CardDefinition, CardId};
use crate::{Result, SanctumError};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::path::Path;
use std::time::{Duration, Instant};

/// Catalog bundled into the binary
const BUILTIN_CATALOG: &str = include_str!("../../data/cards.json");

#[derive(Deserialize)]
struct CatalogFile {
    cards: Vec<CardDefinition>,
}

/// Immutable lookup of card id to definition
#[derive(Debug, Clone, Default)]
pub struct CardCatalog {
    /// Definitions in file order, for listing
    cards: Vec<CardDefinition>,
    index: FxHashMap<CardId, usize>,
}

impl CardCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from definitions, rejecting duplicates and stat-less units
    pub fn from_cards(cards: Vec<CardDefinition>) -> Result<Self> {
        let mut catalog = CardCatalog::new();
        for card in cards {
            if catalog.contains(&card.id) {
                return Err(SanctumError::InvalidCatalog(format!(
                    "duplicate card id {}",
                    card.id
                )));
            }
            if card.is_unit() && (card.atk.is_none() || card.def.is_none() || card.spd.is_none()) {
                return Err(SanctumError::InvalidCatalog(format!(
                    "unit {} is missing atk/def/spd",
                    card.id
                )));
            }
            catalog.add_card(card);
        }
        Ok(catalog)
    }

    /// Parse a catalog from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_cards(file.cards)
    }

    /// The catalog shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    /// Load a catalog file from disk
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Load a catalog file without blocking the runtime, reporting the time taken
    pub async fn load_from_file_async(path: &Path) -> Result<(Self, Duration)> {
        let start = Instant::now();
        let content = tokio::fs::read_to_string(path).await?;
        let catalog = tokio::task::spawn_blocking(move || Self::from_json_str(&content)).await??;
        Ok((catalog, start.elapsed()))
    }

    /// Add a single card definition, replacing any previous entry with the same id
    pub fn add_card(&mut self, card: CardDefinition) {
        if let Some(&pos) = self.index.get(&card.id) {
            self.cards[pos] = card;
        } else {
            self.index.insert(card.id.clone(), self.cards.len());
            self.cards.push(card);
        }
    }

    /// Look up a card by id
    pub fn get(&self, id: &CardId) -> Option<&CardDefinition> {
        self.index.get(id).map(|&pos| &self.cards[pos])
    }

    /// Look up a card by its string id
    pub fn get_by_str(&self, id: &str) -> Option<&CardDefinition> {
        self.get(&CardId::new(id))
    }

    pub fn contains(&self, id: &CardId) -> bool {
        self.index.contains_key(id)
    }

    /// All definitions, in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.iter()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
