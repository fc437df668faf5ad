//! Status effect lifecycle
//!
//! Applies and expires the timed modifiers carried by a battlefield slot.
//! Wither and combat Corrupt are timed against the half-turn counter; buffs
//! and Override against turn boundaries.

use crate::core::{BattlefieldSlot, BuffExpiry, CardDefinition, PlayerState};
use smallvec::SmallVec;

/// Current combat values of a unit after buffs and Wither
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitStats {
    pub atk: i32,
    /// Never below 1
    pub def: i32,
    pub spd: i32,
}

pub struct StatusEffectEngine;

impl StatusEffectEngine {
    /// Effective stats of the unit in `slot`
    pub fn stats(slot: &BattlefieldSlot, card: &CardDefinition) -> UnitStats {
        UnitStats {
            atk: (card.base_atk() + slot.atk_buff).max(0),
            def: (card.base_def() + slot.def_buff - slot.wither_stacks).max(1),
            spd: card.base_spd() + slot.spd_buff,
        }
    }

    pub fn apply_wither(slot: &mut BattlefieldSlot, stacks: i32, half_turn: u32) {
        slot.wither_stacks += stacks;
        slot.wither_applied_half_turn = half_turn;
    }

    /// Corrupt from combat. Returns `false` if the unit was already Corrupted.
    pub fn apply_combat_corrupt(slot: &mut BattlefieldSlot, half_turn: u32) -> bool {
        if slot.corrupt {
            return false;
        }
        slot.corrupt = true;
        slot.corrupt_applied_half_turn = half_turn;
        true
    }

    /// Add a temporary buff; the latest expiry class applies to all buffs on the slot
    pub fn apply_buff(slot: &mut BattlefieldSlot, atk: i32, def: i32, spd: i32, expiry: BuffExpiry) {
        slot.atk_buff += atk;
        slot.def_buff += def;
        slot.spd_buff += spd;
        slot.buff_expiry = expiry;
    }

    pub fn petrify(slot: &mut BattlefieldSlot) {
        slot.no_attack = true;
    }

    /// Corrupt until the end of `turn`, independent of combat Corrupt
    pub fn apply_override(slot: &mut BattlefieldSlot, turn: u32) {
        slot.corrupt = true;
        slot.override_expires_turn = turn;
    }

    /// Clear every negative status, returning what was removed
    pub fn reboot(slot: &mut BattlefieldSlot) -> SmallVec<[&'static str; 5]> {
        let mut cleared = SmallVec::new();
        if slot.wither_stacks > 0 {
            slot.wither_stacks = 0;
            slot.wither_applied_half_turn = 0;
            cleared.push("Wither");
        }
        if slot.corrupt {
            slot.corrupt = false;
            slot.corrupt_applied_half_turn = 0;
            slot.override_expires_turn = 0;
            cleared.push("Corrupt");
        }
        if slot.no_attack {
            slot.no_attack = false;
            cleared.push("Petrify");
        }
        if slot.no_retaliate {
            slot.no_retaliate = false;
            cleared.push("Binding");
        }
        if slot.has_negative_buff() {
            slot.atk_buff = slot.atk_buff.max(0);
            slot.def_buff = slot.def_buff.max(0);
            slot.spd_buff = slot.spd_buff.max(0);
            if slot.atk_buff == 0 && slot.def_buff == 0 && slot.spd_buff == 0 {
                slot.buff_expiry = BuffExpiry::None;
            }
            cleared.push("debuffs");
        }
        cleared
    }

    /// Override corruption ends when the turn it was cast in ends
    pub fn expire_override(player: &mut PlayerState, turn: u32) -> usize {
        let mut expired = 0;
        for slot in player.battlefield.iter_mut().filter(|s| s.is_occupied()) {
            if slot.override_expires_turn != 0 && slot.override_expires_turn == turn {
                slot.corrupt = false;
                slot.override_expires_turn = 0;
                slot.corrupt_applied_half_turn = 0;
                expired += 1;
            }
        }
        expired
    }

    /// End of the holder's turn: end-turn buffs, binding and combat Corrupt lapse
    pub fn expire_end_of_turn(player: &mut PlayerState, half_turn: u32) {
        for slot in player.battlefield.iter_mut().filter(|s| s.is_occupied()) {
            if slot.buff_expiry == BuffExpiry::EndTurn {
                slot.clear_buffs();
            }
            slot.no_retaliate = false;
            if slot.corrupt
                && slot.corrupt_applied_half_turn > 0
                && half_turn > slot.corrupt_applied_half_turn
            {
                slot.corrupt = false;
                slot.corrupt_applied_half_turn = 0;
            }
        }
    }

    /// Start of the holder's turn: Wither, Petrify and next-turn buffs lapse
    pub fn expire_start_of_turn(player: &mut PlayerState) {
        for slot in player.battlefield.iter_mut().filter(|s| s.is_occupied()) {
            slot.wither_stacks = 0;
            slot.wither_applied_half_turn = 0;
            slot.no_attack = false;
            if slot.buff_expiry == BuffExpiry::StartNextTurn {
                slot.clear_buffs();
            }
        }
    }

    /// Turn queued "enters exhausted next turn" flags into exhaustion
    pub fn apply_queued_exhaustion(player: &mut PlayerState) {
        for slot in player.battlefield.iter_mut().filter(|s| s.is_occupied()) {
            if slot.enters_exhausted_next_turn {
                slot.exhausted = true;
                slot.enters_exhausted_next_turn = false;
            }
        }
    }

    /// Ready every unit; petrified units are readied too but still cannot attack
    pub fn ready_all(player: &mut PlayerState) {
        for slot in player.battlefield.iter_mut().filter(|s| s.is_occupied()) {
            slot.exhausted = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CardId;

    fn unit_slot() -> BattlefieldSlot {
        let mut slot = BattlefieldSlot::default();
        slot.deploy(CardId::new("u"), 1, false);
        slot
    }

    fn player_with(slot: BattlefieldSlot) -> PlayerState {
        let mut player = PlayerState::new(Vec::new(), 5);
        player.battlefield[0] = slot;
        player
    }

    #[test]
    fn test_def_never_below_one() {
        let card = CardDefinition::unit("u", "U", 1, 2, 2, 2);
        let mut slot = unit_slot();
        StatusEffectEngine::apply_wither(&mut slot, 5, 3);
        assert_eq!(StatusEffectEngine::stats(&slot, &card).def, 1);
        StatusEffectEngine::apply_buff(&mut slot, 0, 4, 0, BuffExpiry::EndTurn);
        assert_eq!(StatusEffectEngine::stats(&slot, &card).def, 1);
    }

    #[test]
    fn test_combat_corrupt_not_restamped() {
        let mut slot = unit_slot();
        assert!(StatusEffectEngine::apply_combat_corrupt(&mut slot, 2));
        assert!(!StatusEffectEngine::apply_combat_corrupt(&mut slot, 4));
        assert_eq!(slot.corrupt_applied_half_turn, 2);
    }

    #[test]
    fn test_combat_corrupt_lasts_through_holders_turn() {
        let mut slot = unit_slot();
        StatusEffectEngine::apply_combat_corrupt(&mut slot, 2);
        let mut player = player_with(slot);
        // Attacker's own turn end does not touch the defender's slots
        StatusEffectEngine::expire_end_of_turn(&mut player, 2);
        assert!(player.battlefield[0].corrupt);
        StatusEffectEngine::expire_end_of_turn(&mut player, 3);
        assert!(!player.battlefield[0].corrupt);
    }

    #[test]
    fn test_wither_cleared_at_holders_turn_start() {
        let mut slot = unit_slot();
        StatusEffectEngine::apply_wither(&mut slot, 2, 4);
        let mut player = player_with(slot);
        StatusEffectEngine::expire_end_of_turn(&mut player, 4);
        assert_eq!(player.battlefield[0].wither_stacks, 2);
        StatusEffectEngine::expire_start_of_turn(&mut player);
        assert_eq!(player.battlefield[0].wither_stacks, 0);
    }

    #[test]
    fn test_petrify_cleared_at_holders_turn_start() {
        let mut slot = unit_slot();
        StatusEffectEngine::petrify(&mut slot);
        let mut player = player_with(slot);
        StatusEffectEngine::expire_end_of_turn(&mut player, 4);
        assert!(player.battlefield[0].no_attack);
        StatusEffectEngine::expire_start_of_turn(&mut player);
        assert!(!player.battlefield[0].no_attack);
    }

    #[test]
    fn test_buff_expiry_classes() {
        let mut slot = unit_slot();
        StatusEffectEngine::apply_buff(&mut slot, 0, 2, 0, BuffExpiry::StartNextTurn);
        let mut player = player_with(slot);
        StatusEffectEngine::expire_end_of_turn(&mut player, 1);
        assert_eq!(player.battlefield[0].def_buff, 2);
        StatusEffectEngine::expire_start_of_turn(&mut player);
        assert_eq!(player.battlefield[0].def_buff, 0);

        StatusEffectEngine::apply_buff(&mut player.battlefield[0], 1, -1, 0, BuffExpiry::EndTurn);
        StatusEffectEngine::expire_end_of_turn(&mut player, 2);
        assert_eq!(player.battlefield[0].atk_buff, 0);
        assert_eq!(player.battlefield[0].def_buff, 0);
    }

    #[test]
    fn test_override_expires_on_matching_turn() {
        let mut slot = unit_slot();
        StatusEffectEngine::apply_override(&mut slot, 3);
        let mut player = player_with(slot);
        assert_eq!(StatusEffectEngine::expire_override(&mut player, 2), 0);
        assert!(player.battlefield[0].corrupt);
        assert_eq!(StatusEffectEngine::expire_override(&mut player, 3), 1);
        assert!(!player.battlefield[0].corrupt);
    }

    #[test]
    fn test_reboot_lists_cleared_status() {
        let mut slot = unit_slot();
        StatusEffectEngine::apply_wither(&mut slot, 1, 1);
        StatusEffectEngine::petrify(&mut slot);
        StatusEffectEngine::apply_buff(&mut slot, 1, -1, 0, BuffExpiry::EndTurn);
        let cleared = StatusEffectEngine::reboot(&mut slot);
        assert_eq!(cleared.as_slice(), &["Wither", "Petrify", "debuffs"]);
        assert_eq!(slot.atk_buff, 1);
        assert_eq!(slot.def_buff, 0);
        assert!(StatusEffectEngine::reboot(&mut slot).is_empty());
    }

    #[test]
    fn test_queued_exhaustion() {
        let mut slot = unit_slot();
        slot.enters_exhausted_next_turn = true;
        let mut player = player_with(slot);
        StatusEffectEngine::apply_queued_exhaustion(&mut player);
        assert!(player.battlefield[0].exhausted);
        assert!(!player.battlefield[0].enters_exhausted_next_turn);
    }
}
