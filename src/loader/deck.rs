//! Deck file loader (.deck format)
//!
//! ```text
//! # comment
//! [metadata]
//! Name=Skyforge
//! Faction=Skyforge
//!
//! [Main]
//! 3 skyforge_skyforge_drone
//! ```

use crate::core::{CardId, Faction};
use crate::loader::CardCatalog;
use crate::{Result, SanctumError};
use std::fs;
use std::path::Path;

const SKYFORGE_DECK: &str = include_str!("../../decks/skyforge.deck");
const MIASMA_DECK: &str = include_str!("../../decks/miasma.deck");

/// Factions with a bundled starter deck
pub const STARTER_FACTIONS: [&str; 2] = [Faction::SKYFORGE, Faction::MIASMA];

/// Deck loader for .deck files
pub struct DeckLoader;

impl DeckLoader {
    /// Load a deck from a .deck file
    pub fn load_from_file(path: &Path) -> Result<DeckList> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// The bundled 42-card starter deck for `faction` (case-insensitive)
    pub fn starter_deck(faction: &str) -> Result<DeckList> {
        let faction = Faction::new(faction);
        if faction.is(Faction::SKYFORGE) {
            Self::parse(SKYFORGE_DECK)
        } else if faction.is(Faction::MIASMA) {
            Self::parse(MIASMA_DECK)
        } else {
            Err(SanctumError::UnknownFaction(faction.to_string()))
        }
    }

    /// Parse a deck from its text content
    pub fn parse(content: &str) -> Result<DeckList> {
        let mut name = None;
        let mut faction = None;
        let mut main_deck = Vec::new();
        let mut in_metadata = false;

        for (number, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                in_metadata = section.eq_ignore_ascii_case("metadata");
                continue;
            }

            if in_metadata {
                match line.split_once('=') {
                    Some(("Name", value)) => name = Some(value.trim().to_string()),
                    Some(("Faction", value)) => faction = Some(Faction::new(value.trim())),
                    _ => {}
                }
                continue;
            }

            // Format: "3 card_id"
            let entry = line
                .split_once(char::is_whitespace)
                .and_then(|(count, id)| {
                    let count = count.parse::<u8>().ok()?;
                    Some(DeckEntry {
                        card_id: CardId::new(id.trim()),
                        count,
                    })
                })
                .ok_or_else(|| {
                    SanctumError::InvalidDeckFormat(format!(
                        "line {}: expected '<count> <card_id>', got '{line}'",
                        number + 1
                    ))
                })?;
            main_deck.push(entry);
        }

        if main_deck.is_empty() {
            return Err(SanctumError::InvalidDeckFormat("Empty deck".to_string()));
        }

        Ok(DeckList {
            name: name.unwrap_or_default(),
            faction,
            main_deck,
        })
    }
}

/// Represents a deck entry (card id and count)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckEntry {
    pub card_id: CardId,
    pub count: u8,
}

/// Represents a complete deck list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckList {
    pub name: String,
    pub faction: Option<Faction>,
    pub main_deck: Vec<DeckEntry>,
}

impl DeckList {
    /// Total cards in main deck
    pub fn total_cards(&self) -> usize {
        self.main_deck.iter().map(|e| e.count as usize).sum()
    }

    /// One id per physical card, in list order
    ///
    /// Fails on the first id the catalog does not know.
    pub fn expand(&self, catalog: &CardCatalog) -> Result<Vec<CardId>> {
        let mut cards = Vec::with_capacity(self.total_cards());
        for entry in &self.main_deck {
            if !catalog.contains(&entry.card_id) {
                return Err(SanctumError::UnknownCard(entry.card_id.to_string()));
            }
            cards.extend(std::iter::repeat(entry.card_id.clone()).take(entry.count as usize));
        }
        Ok(cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_deck() {
        let content = r#"
# two-card test deck
[metadata]
Name=Test Deck
Faction=Miasma

[Main]
20 t_brute
2 generic_false_step
"#;

        let deck = DeckLoader::parse(content).unwrap();
        assert_eq!(deck.name, "Test Deck");
        assert_eq!(deck.faction, Some(Faction::new("Miasma")));
        assert_eq!(deck.main_deck.len(), 2);
        assert_eq!(deck.total_cards(), 22);
        assert_eq!(deck.main_deck[1].card_id, CardId::new("generic_false_step"));
        assert_eq!(deck.main_deck[1].count, 2);
    }

    #[test]
    fn test_bad_line_reports_position() {
        let err = DeckLoader::parse("[Main]\n3 a\nthree b\n").unwrap_err();
        assert!(err.to_string().contains("line 3"), "{err}");
    }

    #[test]
    fn test_empty_deck_rejected() {
        assert!(matches!(
            DeckLoader::parse("[metadata]\nName=Nothing\n"),
            Err(SanctumError::InvalidDeckFormat(_))
        ));
    }

    #[test]
    fn test_starter_decks_expand() {
        let catalog = CardCatalog::builtin().unwrap();
        for faction in STARTER_FACTIONS {
            let deck = DeckLoader::starter_deck(faction).unwrap();
            assert_eq!(deck.faction, Some(Faction::new(faction)));
            assert_eq!(deck.expand(&catalog).unwrap().len(), 42);
        }
        assert!(DeckLoader::starter_deck("skyforge").is_ok());
        assert!(matches!(
            DeckLoader::starter_deck("Gnome"),
            Err(SanctumError::UnknownFaction(_))
        ));
    }

    #[test]
    fn test_unknown_card_rejected() {
        let deck = DeckLoader::parse("[Main]\n1 not_a_card\n").unwrap();
        let catalog = CardCatalog::builtin().unwrap();
        assert!(matches!(deck.expand(&catalog), Err(SanctumError::UnknownCard(_))));
    }
}
