//! Core game types and entities

pub mod card;
pub mod player;
pub mod slot;
pub mod types;

pub use card::{CardDefinition, CardType, Keyword};
pub use player::PlayerState;
pub use slot::{BattlefieldSlot, BuffExpiry, BOARD_SLOTS, TRAP_SLOTS};
pub use types::{CardId, Faction, GameId, PlayerId};
