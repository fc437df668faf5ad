//! Battlefield slot records
//!
//! Each of a player's five battlefield positions is one structured record:
//! the occupant plus every piece of per-unit runtime status.

use crate::core::CardId;
use serde::{Deserialize, Serialize};

/// Number of battlefield slots per player
pub const BOARD_SLOTS: usize = 5;

/// Number of face-down trap slots per player
pub const TRAP_SLOTS: usize = 3;

/// When a temporary stat buff wears off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuffExpiry {
    #[default]
    None,
    /// Cleared when the holder's turn ends
    EndTurn,
    /// Cleared when the holder's next turn starts
    StartNextTurn,
}

/// One battlefield position and the status of its occupant
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BattlefieldSlot {
    pub occupant: Option<CardId>,
    pub exhausted: bool,
    pub wither_stacks: i32,
    pub wither_applied_half_turn: u32,
    pub corrupt: bool,
    /// Half-turn a combat Corrupt was applied (0 when not combat-applied)
    pub corrupt_applied_half_turn: u32,
    pub atk_buff: i32,
    pub def_buff: i32,
    pub spd_buff: i32,
    pub buff_expiry: BuffExpiry,
    pub no_retaliate: bool,
    /// Petrify: the unit cannot attack
    pub no_attack: bool,
    pub enters_exhausted_next_turn: bool,
    pub deployed_turn: u32,
    /// Turn at whose end an Override corruption wears off (0 when none)
    pub override_expires_turn: u32,
}

impl BattlefieldSlot {
    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Put a freshly deployed card into this slot with a clean status record
    pub fn deploy(&mut self, card: CardId, turn: u32, exhausted: bool) {
        *self = BattlefieldSlot {
            occupant: Some(card),
            exhausted,
            deployed_turn: turn,
            ..BattlefieldSlot::default()
        };
    }

    /// Empty the slot, returning the card that was in it
    ///
    /// All status is reset so nothing leaks to the next occupant.
    pub fn take(&mut self) -> Option<CardId> {
        std::mem::take(self).occupant
    }

    pub fn clear_buffs(&mut self) {
        self.atk_buff = 0;
        self.def_buff = 0;
        self.spd_buff = 0;
        self.buff_expiry = BuffExpiry::None;
    }

    pub fn has_negative_buff(&self) -> bool {
        self.atk_buff < 0 || self.def_buff < 0 || self.spd_buff < 0
    }
}
