//! Per-player zones and counters

use crate::core::{BattlefieldSlot, CardId, BOARD_SLOTS, TRAP_SLOTS};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One player's deck, hand, battlefield, field, traps, discard and counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Draws come off the front
    pub deck: VecDeque<CardId>,
    pub hand: Vec<CardId>,
    pub battlefield: [BattlefieldSlot; BOARD_SLOTS],
    pub field: Option<CardId>,
    pub traps: [Option<CardId>; TRAP_SLOTS],
    pub discard: Vec<CardId>,
    pub energy: i32,
    pub control_loss: u32,
    /// Cards that must be discarded before the turn can end
    pub must_discard: usize,
    /// Energy granted at the start of the next turn
    pub pending_energy: i32,
    /// Units that must be destroyed before the turn can end
    pub rotfall_must_destroy: usize,
    pub skip_next_energy_gain: bool,
}

impl PlayerState {
    pub fn new(deck: Vec<CardId>, starting_energy: i32) -> Self {
        PlayerState {
            deck: deck.into(),
            hand: Vec::new(),
            battlefield: Default::default(),
            field: None,
            traps: Default::default(),
            discard: Vec::new(),
            energy: starting_energy,
            control_loss: 0,
            must_discard: 0,
            pending_energy: 0,
            rotfall_must_destroy: 0,
            skip_next_energy_gain: false,
        }
    }

    /// Move the top card of the deck into the hand
    ///
    /// Returns `None` when the deck is empty; the caller decides whether that
    /// loses the game.
    pub fn draw(&mut self) -> Option<CardId> {
        let card = self.deck.pop_front()?;
        self.hand.push(card.clone());
        Some(card)
    }

    /// Remove the first copy of `card` from the hand
    pub fn remove_from_hand(&mut self, card: &CardId) -> bool {
        match self.hand.iter().position(|c| c == card) {
            Some(pos) => {
                self.hand.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn has_in_hand(&self, card: &CardId) -> bool {
        self.hand.contains(card)
    }

    pub fn slot(&self, index: usize) -> Option<&BattlefieldSlot> {
        self.battlefield.get(index)
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut BattlefieldSlot> {
        self.battlefield.get_mut(index)
    }

    pub fn first_empty_slot(&self) -> Option<usize> {
        self.battlefield.iter().position(BattlefieldSlot::is_empty)
    }

    pub fn first_empty_trap_slot(&self) -> Option<usize> {
        self.traps.iter().position(Option::is_none)
    }

    /// Indices of occupied battlefield slots, lowest first
    pub fn occupied_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.battlefield
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_occupied())
            .map(|(i, _)| i)
    }

    pub fn unit_count(&self) -> usize {
        self.battlefield.iter().filter(|s| s.is_occupied()).count()
    }

    pub fn trap_count(&self) -> usize {
        self.traps.iter().filter(|t| t.is_some()).count()
    }

    /// Empty a battlefield slot and put its occupant in the discard pile
    pub fn destroy_unit(&mut self, index: usize) -> Option<CardId> {
        let card = self.battlefield.get_mut(index)?.take()?;
        self.discard.push(card.clone());
        Some(card)
    }

    /// Empty the field slot into the discard pile
    pub fn destroy_field(&mut self) -> Option<CardId> {
        let field = self.field.take()?;
        self.discard.push(field.clone());
        Some(field)
    }

    /// Accrue energy for the next turn start; capped at +1
    pub fn accrue_pending_energy(&mut self) {
        self.pending_energy = (self.pending_energy + 1).min(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<CardId> {
        names.iter().map(|n| CardId::new(*n)).collect()
    }

    #[test]
    fn test_draw_from_front() {
        let mut player = PlayerState::new(ids(&["a", "b"]), 5);
        assert_eq!(player.draw(), Some(CardId::new("a")));
        assert_eq!(player.draw(), Some(CardId::new("b")));
        assert_eq!(player.draw(), None);
        assert_eq!(player.hand, ids(&["a", "b"]));
    }

    #[test]
    fn test_remove_from_hand_removes_one_copy() {
        let mut player = PlayerState::new(Vec::new(), 5);
        player.hand = ids(&["x", "x", "y"]);
        assert!(player.remove_from_hand(&CardId::new("x")));
        assert_eq!(player.hand, ids(&["x", "y"]));
        assert!(!player.remove_from_hand(&CardId::new("z")));
    }

    #[test]
    fn test_destroy_unit_moves_to_discard() {
        let mut player = PlayerState::new(Vec::new(), 5);
        player.battlefield[2].deploy(CardId::new("u"), 1, false);
        assert_eq!(player.unit_count(), 1);
        assert_eq!(player.destroy_unit(2), Some(CardId::new("u")));
        assert_eq!(player.discard, ids(&["u"]));
        assert_eq!(player.unit_count(), 0);
        assert_eq!(player.destroy_unit(2), None);
    }

    #[test]
    fn test_pending_energy_caps_at_one() {
        let mut player = PlayerState::new(Vec::new(), 5);
        player.accrue_pending_energy();
        player.accrue_pending_energy();
        assert_eq!(player.pending_energy, 1);
    }
}
