//! Card catalog and deck loaders

pub mod catalog;
pub mod deck;
pub mod deck_async;
pub mod game_init;

pub use catalog::CardCatalog;
pub use deck::{DeckEntry, DeckList, DeckLoader, STARTER_FACTIONS};
pub use deck_async::{load_deck_async, load_deck_pair};
pub use game_init::GameInitializer;
