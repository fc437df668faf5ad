//! Trap detection and the accept/decline cycle

use crate::core::{CardId, PlayerId};
use crate::game::status::StatusEffectEngine;
use crate::game::{ActionOutcome, GameState, TrapEffect, TriggerEvent};

/// A face-down trap able to answer an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrapMatch {
    pub slot: usize,
    pub card_id: CardId,
    pub name: String,
    pub cost: i32,
    pub trigger_message: String,
}

impl GameState {
    /// Traps of `defender` that listen for `event` and that they can pay for
    ///
    /// Ordered by trap slot. Prompting, and the accept/decline answers, are up
    /// to the caller.
    pub fn check_traps(&self, defender: PlayerId, event: &TriggerEvent) -> Vec<TrapMatch> {
        let trigger = event.trigger_type();
        let state = self.player(defender);
        let matches: Vec<TrapMatch> = state
            .traps
            .iter()
            .enumerate()
            .filter_map(|(slot, trap)| {
                let card_id = trap.as_ref()?;
                let definition = self.effects().trap(card_id)?;
                if definition.trigger != trigger {
                    return None;
                }
                let card = self.card(card_id)?;
                if state.energy < card.cost {
                    return None;
                }
                Some(TrapMatch {
                    slot,
                    card_id: card_id.clone(),
                    name: card.name.clone(),
                    cost: card.cost,
                    trigger_message: event.message(),
                })
            })
            .collect();
        self.debug(format!(
            "trap scan for {defender} on {trigger:?}: {} match(es)",
            matches.len()
        ));
        matches
    }

    /// The defender's answer to a trap prompt
    ///
    /// When the interrupted attack belongs to the AI and survives the trap,
    /// the attack is declared again straight away and its outcome returned.
    pub fn resolve_trap(&mut self, player: PlayerId, trap_slot: usize, activate: bool) -> ActionOutcome {
        if let Some(over) = self.game_over_outcome() {
            return over;
        }
        let Some(pending) = &self.pending_attack else {
            return ActionOutcome::not_found("No trap prompt is pending");
        };
        if pending.attacker_player.opponent() != player {
            return ActionOutcome::illegal("Only the defending player can answer a trap prompt");
        }
        if pending.awaiting != Some(trap_slot) {
            return ActionOutcome::not_found("That trap was not prompted");
        }

        let answered = self.answer_trap(player, trap_slot, activate);
        if !answered.is_success() {
            return answered;
        }
        match self.pending_attack.clone() {
            Some(p) if self.is_ai(p.attacker_player) => {
                self.attack(p.attacker_player, p.attacker_slot, p.defender_slot)
            }
            _ => answered,
        }
    }

    /// Apply an accept or decline to the pending attack
    pub(crate) fn answer_trap(&mut self, defender: PlayerId, trap_slot: usize, activate: bool) -> ActionOutcome {
        let Some(mut pending) = self.pending_attack.take() else {
            return ActionOutcome::not_found("No trap prompt is pending");
        };
        let Some(card_id) = self.player(defender).traps.get(trap_slot).cloned().flatten() else {
            self.pending_attack = Some(pending);
            return ActionOutcome::not_found("No trap in that slot");
        };
        let name = self.card_name(&card_id);

        if !activate {
            pending.awaiting = None;
            pending.declined.push(trap_slot);
            self.pending_attack = Some(pending);
            self.log(format!("{defender} did not activate {name}"));
            return ActionOutcome::success(format!("{name} was not activated"));
        }

        let cost = self.card(&card_id).map_or(0, |c| c.cost);
        if self.player(defender).energy < cost {
            self.pending_attack = Some(pending);
            return ActionOutcome::resource(format!("Not enough energy to activate {name}"));
        }
        {
            let state = self.player_mut(defender);
            state.energy -= cost;
            state.traps[trap_slot] = None;
            state.discard.push(card_id.clone());
        }
        self.log(format!("{defender} activated {name}!"));

        let effect = self
            .effects()
            .trap(&card_id)
            .map(|t| t.effect.clone())
            .unwrap_or(TrapEffect::Inert);
        let attacker = pending.attacker_player;
        let attacker_slot = pending.attacker_slot;
        let attacker_name = self.unit_name(attacker, attacker_slot);

        match effect {
            TrapEffect::Inert => {
                pending.awaiting = None;
                self.pending_attack = Some(pending);
                ActionOutcome::success(format!("{name} had no effect on the attack"))
            }
            TrapEffect::CancelAttack { exhaust_attacker } => {
                if exhaust_attacker {
                    if let Some(slot) = self.player_mut(attacker).slot_mut(attacker_slot) {
                        slot.exhausted = true;
                    }
                }
                self.log(format!("{name} cancelled {attacker_name}'s attack"));
                ActionOutcome::success(format!("{attacker_name}'s attack was cancelled"))
            }
            TrapEffect::ReturnAttackerToHand => {
                let state = self.player_mut(attacker);
                if let Some(card) = state.battlefield[attacker_slot].take() {
                    state.hand.push(card);
                }
                self.log(format!("{name} returned {attacker_name} to its owner's hand"));
                ActionOutcome::success(format!("{attacker_name} was returned to hand"))
            }
            TrapEffect::WitherAttacker(stacks) => {
                let half_turn = self.half_turn;
                if let Some(slot) = self.player_mut(attacker).slot_mut(attacker_slot) {
                    StatusEffectEngine::apply_wither(slot, stacks, half_turn);
                }
                self.log(format!("{name} withers {attacker_name}"));
                pending.awaiting = None;
                self.pending_attack = Some(pending);
                ActionOutcome::success(format!("{attacker_name} withers but the attack continues"))
            }
        }
    }
}
