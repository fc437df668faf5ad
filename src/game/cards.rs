//! Playing cards from hand
//!
//! Units, fields and traps go to their zones. Techniques resolve through the
//! effect registry, either at once or after the caster names a target.

use crate::core::{CardDefinition, CardId, CardType, Keyword, PlayerId};
use crate::game::status::StatusEffectEngine;
use crate::game::{
    ActionOutcome, FieldEffect, GameState, ImmediateEffect, PendingTechnique, Phase, TargetClass,
    TargetedAction, TechniqueEffect,
};

impl GameState {
    /// Energy `player` would pay for `card` right now
    ///
    /// Traps are free to set. A cost-reduction field never takes a cost below 1.
    pub fn actual_cost(&self, player: PlayerId, card: &CardDefinition) -> i32 {
        match card.card_type {
            CardType::Trap => 0,
            CardType::Unit => match self.field_effect(player) {
                Some(FieldEffect::CostReduction { faction, amount }) if card.faction.is(&faction) => {
                    (card.cost - amount).max(1)
                }
                _ => card.cost,
            },
            CardType::Field | CardType::Technique => card.cost,
        }
    }

    /// Play `card_id` from `player`'s hand
    pub fn play_card(&mut self, player: PlayerId, card_id: &CardId) -> ActionOutcome {
        if let Some(over) = self.game_over_outcome() {
            return over;
        }
        if player != self.active_player {
            return ActionOutcome::illegal("It is not your turn");
        }
        if self.phase != Phase::Deploy {
            return ActionOutcome::illegal("Cards can only be played during the deploy phase");
        }
        if let Some(pending) = &self.pending_technique {
            return ActionOutcome::conflict(format!(
                "Choose a target for {} first",
                self.card_name(&pending.card_id)
            ));
        }
        if !self.player(player).has_in_hand(card_id) {
            return ActionOutcome::not_found("Card not in hand");
        }
        let Some(card) = self.card(card_id).cloned() else {
            return ActionOutcome::not_found(format!("Unknown card {card_id}"));
        };

        let state = self.player(player);
        let unit_slot = state.first_empty_slot();
        let trap_slot = state.first_empty_trap_slot();
        match card.card_type {
            CardType::Unit if unit_slot.is_none() => {
                return ActionOutcome::resource("No empty battlefield slot");
            }
            CardType::Trap if trap_slot.is_none() => {
                return ActionOutcome::resource("All trap slots full");
            }
            _ => {}
        }

        let cost = self.actual_cost(player, &card);
        let energy = self.player(player).energy;
        if energy < cost {
            return ActionOutcome::resource(format!(
                "Not enough energy (need {cost}, have {energy})"
            ));
        }

        let state = self.player_mut(player);
        state.remove_from_hand(card_id);
        state.energy -= cost;

        match (card.card_type, unit_slot, trap_slot) {
            (CardType::Unit, Some(slot), _) => self.deploy_unit(player, &card, slot),
            (CardType::Field, _, _) => self.activate_field(player, &card),
            (CardType::Trap, _, Some(slot)) => {
                self.player_mut(player).traps[slot] = Some(card.id.clone());
                self.log(format!("{player} set a trap"));
                ActionOutcome::success("Trap set")
            }
            (CardType::Technique, _, _) => self.play_technique(player, &card),
            _ => ActionOutcome::resource("No free slot"),
        }
    }

    fn deploy_unit(&mut self, player: PlayerId, card: &CardDefinition, slot: usize) -> ActionOutcome {
        let turn = self.turn;
        let half_turn = self.half_turn;
        let swift = card.has_keyword(&Keyword::Swift);
        self.player_mut(player).battlefield[slot].deploy(card.id.clone(), turn, !swift);
        self.log(format!("{player} deployed {} to slot {}", card.name, slot + 1));

        if let Some(FieldEffect::WitherOnEnemyDeploy(stacks)) = self.field_effect(player.opponent()) {
            StatusEffectEngine::apply_wither(&mut self.player_mut(player).battlefield[slot], stacks, half_turn);
            self.log(format!("{} enters with {stacks} Wither", card.name));
        }
        ActionOutcome::success(format!("{} deployed", card.name))
    }

    fn activate_field(&mut self, player: PlayerId, card: &CardDefinition) -> ActionOutcome {
        if let Some(old) = self.player_mut(player).destroy_field() {
            let old_name = self.card_name(&old);
            self.log(format!("{old_name} was replaced"));
        }
        self.player_mut(player).field = Some(card.id.clone());
        self.log(format!("{player} activated {}", card.name));
        ActionOutcome::success(format!("{} activated", card.name))
    }

    fn play_technique(&mut self, player: PlayerId, card: &CardDefinition) -> ActionOutcome {
        self.player_mut(player).discard.push(card.id.clone());
        self.log(format!("{player} played {}", card.name));

        let effect = self.effects().technique(&card.id).cloned();
        match effect {
            Some(TechniqueEffect::Immediate(effect)) => self.resolve_immediate(player, card, &effect),
            Some(TechniqueEffect::Targeted { target, .. }) => {
                self.pending_technique = Some(PendingTechnique {
                    player,
                    card_id: card.id.clone(),
                    target,
                });
                ActionOutcome::NeedsTarget {
                    card_id: card.id.clone(),
                    target,
                }
            }
            None => {
                self.log(format!("{} effect not yet implemented", card.name));
                ActionOutcome::success(format!("{} had no effect", card.name))
            }
        }
    }

    fn resolve_immediate(&mut self, player: PlayerId, card: &CardDefinition, effect: &ImmediateEffect) -> ActionOutcome {
        let enemy = player.opponent();
        let half_turn = self.half_turn;
        let message = match *effect {
            ImmediateEffect::WitherAllEnemies(stacks) => {
                let mut hit = 0;
                for slot in self.player_mut(enemy).battlefield.iter_mut().filter(|s| s.is_occupied()) {
                    StatusEffectEngine::apply_wither(slot, stacks, half_turn);
                    hit += 1;
                }
                format!("{} withered {hit} enemy units", card.name)
            }
            ImmediateEffect::ExhaustAllEnemies => {
                let mut hit = 0;
                for slot in self
                    .player_mut(enemy)
                    .battlefield
                    .iter_mut()
                    .filter(|s| s.is_occupied() && !s.exhausted)
                {
                    slot.exhausted = true;
                    hit += 1;
                }
                format!("{} exhausted {hit} enemy units", card.name)
            }
            ImmediateEffect::Draw {
                base,
                bonus_without_field,
            } => {
                let count = if self.player(player).field.is_none() {
                    base + bonus_without_field
                } else {
                    base
                };
                if !self.draw_cards(player, count) {
                    return ActionOutcome::GameOver { winner: enemy };
                }
                format!("{player} drew {count} card(s)")
            }
            ImmediateEffect::EnergySurge(amount) => {
                let state = self.player_mut(player);
                state.energy += amount;
                state.skip_next_energy_gain = true;
                format!("{player} gained {amount} energy and will skip the next energy gain")
            }
            ImmediateEffect::DestroyEnemyField => match self.player_mut(enemy).destroy_field() {
                Some(field) => format!("{} destroyed {}", card.name, self.card_name(&field)),
                None => "The opponent has no field to destroy".to_string(),
            },
        };
        self.log(&message);
        ActionOutcome::success(message)
    }

    /// Supply the target for the technique `player` just played
    pub fn apply_targeted_technique(
        &mut self,
        player: PlayerId,
        card_id: &CardId,
        target_player: PlayerId,
        target_slot: usize,
    ) -> ActionOutcome {
        if let Some(over) = self.game_over_outcome() {
            return over;
        }
        let Some(pending) = self.pending_technique.clone() else {
            return ActionOutcome::not_found("No technique is waiting for a target");
        };
        if pending.player != player || &pending.card_id != card_id {
            return ActionOutcome::not_found(format!("{} is not waiting for a target", self.card_name(card_id)));
        }
        if self.unit_at(target_player, target_slot).is_none() {
            return ActionOutcome::not_found("No unit in target slot");
        }
        match pending.target {
            TargetClass::FriendlyUnit if target_player != player => {
                return ActionOutcome::illegal("Can only target your own Units");
            }
            TargetClass::EnemyUnit if target_player == player => {
                return ActionOutcome::illegal("Must target an enemy Unit");
            }
            _ => {}
        }

        let actions = match self.effects().technique(card_id) {
            Some(TechniqueEffect::Targeted { actions, .. }) => actions.clone(),
            _ => return ActionOutcome::not_found("Technique has no targeted effect"),
        };
        self.pending_technique = None;

        let card_name = self.card_name(card_id);
        let unit_name = self.unit_name(target_player, target_slot);
        let turn = self.turn;
        let half_turn = self.half_turn;
        let mut notes: Vec<String> = Vec::new();
        let slot = &mut self.player_mut(target_player).battlefield[target_slot];
        for action in &actions {
            match *action {
                TargetedAction::Buff { atk, def, spd, expiry } => {
                    StatusEffectEngine::apply_buff(slot, atk, def, spd, expiry);
                    notes.push(format_buff(atk, def, spd));
                }
                TargetedAction::Ready => {
                    slot.exhausted = false;
                    notes.push("readied".to_string());
                }
                TargetedAction::ExhaustNextTurn => {
                    slot.enters_exhausted_next_turn = true;
                    notes.push("will be exhausted next turn".to_string());
                }
                TargetedAction::Bind => {
                    slot.no_retaliate = true;
                    notes.push("cannot retaliate".to_string());
                }
                TargetedAction::Petrify => {
                    StatusEffectEngine::petrify(slot);
                    notes.push("is petrified".to_string());
                }
                TargetedAction::WitherIfCorrupt(stacks) => {
                    if slot.corrupt {
                        StatusEffectEngine::apply_wither(slot, stacks, half_turn);
                        notes.push(format!("gains {stacks} Wither"));
                    } else {
                        notes.push("is not Corrupted, no effect".to_string());
                    }
                }
                TargetedAction::Override => {
                    StatusEffectEngine::apply_override(slot, turn);
                    notes.push("is Corrupted until end of turn".to_string());
                }
                TargetedAction::Reboot => {
                    let cleared = StatusEffectEngine::reboot(slot);
                    if cleared.is_empty() {
                        notes.push("had nothing to clear".to_string());
                    } else {
                        notes.push(format!("cleared {}", cleared.join(", ")));
                    }
                }
            }
        }

        let message = format!("{card_name}: {unit_name} {}", notes.join(", "));
        self.log(&message);
        ActionOutcome::success(message)
    }
}

fn format_buff(atk: i32, def: i32, spd: i32) -> String {
    let parts: Vec<String> = [("ATK", atk), ("DEF", def), ("SPD", spd)]
        .into_iter()
        .filter(|(_, v)| *v != 0)
        .map(|(stat, v)| format!("{v:+} {stat}"))
        .collect();
    format!("gets {}", parts.join(" "))
}
