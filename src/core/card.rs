//! Card types and definitions

use crate::core::{CardId, Faction};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// The four card types of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardType {
    Unit,
    Field,
    Trap,
    Technique,
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CardType::Unit => "UNIT",
            CardType::Field => "FIELD",
            CardType::Trap => "TRAP",
            CardType::Technique => "TECHNIQUE",
        };
        write!(f, "{s}")
    }
}

/// Unit keywords
///
/// Keywords are not abilities: Corrupt never suppresses them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Keyword {
    /// Ignores the SPD restriction on the turn it was deployed
    Swift,
    /// Opposing attacks must target a Guard unit while one exists
    Guard,
    /// Excess lethal damage carries to a second target
    Pierce,
    /// Surviving defenders gain a Wither stack
    Wither,
    /// Surviving defenders become Corrupted
    Corrupt,
    /// Catch-all for keywords the engine has no rule for
    Other(String),
}

impl From<String> for Keyword {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Swift" => Keyword::Swift,
            "Guard" => Keyword::Guard,
            "Pierce" => Keyword::Pierce,
            "Wither" => Keyword::Wither,
            "Corrupt" => Keyword::Corrupt,
            _ => Keyword::Other(s),
        }
    }
}

impl From<Keyword> for String {
    fn from(k: Keyword) -> Self {
        match k {
            Keyword::Swift => "Swift".to_string(),
            Keyword::Guard => "Guard".to_string(),
            Keyword::Pierce => "Pierce".to_string(),
            Keyword::Wither => "Wither".to_string(),
            Keyword::Corrupt => "Corrupt".to_string(),
            Keyword::Other(s) => s,
        }
    }
}

/// Immutable catalog entry for a card
///
/// Game state refers to cards only by [`CardId`]; the definition is looked up
/// in the shared [`crate::core::CardCatalog`] whenever stats are needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub id: CardId,

    pub name: String,

    #[serde(rename = "type")]
    pub card_type: CardType,

    /// Energy cost to play (activation cost for traps)
    pub cost: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atk: Option<i32>,

    #[serde(default, rename = "def", skip_serializing_if = "Option::is_none")]
    pub def: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spd: Option<i32>,

    #[serde(default)]
    pub keywords: SmallVec<[Keyword; 2]>,

    #[serde(default)]
    pub faction: Faction,

    /// Rules text shown to players
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
}

impl CardDefinition {
    /// Build a unit definition with no keywords
    pub fn unit(id: &str, name: &str, cost: i32, atk: i32, def: i32, spd: i32) -> Self {
        CardDefinition {
            id: CardId::new(id),
            name: name.to_string(),
            card_type: CardType::Unit,
            cost,
            atk: Some(atk),
            def: Some(def),
            spd: Some(spd),
            keywords: SmallVec::new(),
            faction: Faction::default(),
            text: String::new(),
        }
    }

    /// Build a non-unit definition (field, trap or technique)
    pub fn non_unit(id: &str, name: &str, card_type: CardType, cost: i32) -> Self {
        CardDefinition {
            id: CardId::new(id),
            name: name.to_string(),
            card_type,
            cost,
            atk: None,
            def: None,
            spd: None,
            keywords: SmallVec::new(),
            faction: Faction::default(),
            text: String::new(),
        }
    }

    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        self.keywords.push(keyword);
        self
    }

    pub fn with_faction(mut self, faction: &str) -> Self {
        self.faction = Faction::new(faction);
        self
    }

    pub fn has_keyword(&self, keyword: &Keyword) -> bool {
        self.keywords.contains(keyword)
    }

    pub fn is_unit(&self) -> bool {
        self.card_type == CardType::Unit
    }

    pub fn base_atk(&self) -> i32 {
        self.atk.unwrap_or(0)
    }

    pub fn base_def(&self) -> i32 {
        self.def.unwrap_or(0)
    }

    pub fn base_spd(&self) -> i32 {
        self.spd.unwrap_or(0)
    }
}
