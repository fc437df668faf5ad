//! Combat resolution
//!
//! One declared attack at a time: legality, trap interrupts, damage,
//! Wither/Corrupt on survivors, retaliation and Pierce overflow.

use crate::core::{Keyword, PlayerId};
use crate::game::status::{StatusEffectEngine, UnitStats};
use crate::game::{
    ActionOutcome, CombatReport, FieldEffect, GameState, HeuristicController, PendingAttack,
    PendingPierce, Phase, TrapPrompt, TriggerEvent,
};

impl GameState {
    /// Why `player` may not attack `defender_slot` with `attacker_slot`
    ///
    /// Returns `None` when the attack is legal. Checks run in a fixed order
    /// and the first failure is reported.
    pub fn attack_rejection(
        &self,
        player: PlayerId,
        attacker_slot: usize,
        defender_slot: usize,
    ) -> Option<ActionOutcome> {
        if player != self.active_player {
            return Some(ActionOutcome::illegal("It is not your turn"));
        }
        if self.phase != Phase::Combat {
            return Some(ActionOutcome::illegal(
                "Attacks can only be declared during the combat phase",
            ));
        }

        let Some(slot) = self.player(player).slot(attacker_slot).filter(|s| s.is_occupied()) else {
            return Some(ActionOutcome::not_found("No unit in attacker slot"));
        };
        if slot.exhausted {
            return Some(ActionOutcome::illegal("Unit is exhausted"));
        }
        if slot.no_attack {
            return Some(ActionOutcome::illegal("Unit is petrified and cannot attack"));
        }
        let Some((_, card)) = self.unit_at(player, attacker_slot) else {
            return Some(ActionOutcome::not_found("Unknown card in attacker slot"));
        };
        if !card.is_unit() {
            return Some(ActionOutcome::illegal("Only Units can attack"));
        }
        if self.turn == 1 {
            return Some(ActionOutcome::illegal("No attacks are allowed on the first turn"));
        }

        let defender = player.opponent();
        let Some((defender_state, defender_card)) = self.unit_at(defender, defender_slot) else {
            return Some(ActionOutcome::not_found("No unit in defender slot"));
        };

        let attacker = StatusEffectEngine::stats(slot, card);
        let target = StatusEffectEngine::stats(defender_state, defender_card);
        let swift_entry = card.has_keyword(&Keyword::Swift) && slot.deployed_turn == self.turn;
        if attacker.spd < target.spd && !swift_entry {
            return Some(ActionOutcome::illegal(format!(
                "{} is too slow to attack {} (SPD {} vs {})",
                card.name, defender_card.name, attacker.spd, target.spd
            )));
        }

        let guards: Vec<usize> = self
            .player(defender)
            .occupied_slots()
            .filter(|&i| {
                self.unit_at(defender, i)
                    .is_some_and(|(_, c)| c.has_keyword(&Keyword::Guard))
            })
            .collect();
        if !guards.is_empty() && !guards.contains(&defender_slot) {
            return Some(ActionOutcome::illegal("You must attack a Guard unit first"));
        }

        None
    }

    /// Defender slots `attacker_slot` may legally attack right now
    pub fn legal_attack_targets(&self, player: PlayerId, attacker_slot: usize) -> Vec<usize> {
        self.player(player.opponent())
            .occupied_slots()
            .filter(|&d| self.attack_rejection(player, attacker_slot, d).is_none())
            .collect()
    }

    /// Effective stats of the unit at `player`/`slot`
    pub fn unit_stats(&self, player: PlayerId, slot: usize) -> Option<UnitStats> {
        self.unit_at(player, slot)
            .map(|(s, card)| StatusEffectEngine::stats(s, card))
    }

    /// Declare and, unless a trap interrupts, resolve an attack
    pub fn attack(&mut self, player: PlayerId, attacker_slot: usize, defender_slot: usize) -> ActionOutcome {
        if let Some(over) = self.game_over_outcome() {
            return over;
        }
        if let Some(pending) = &self.pending_attack {
            if pending.awaiting.is_some() {
                return ActionOutcome::conflict("A trap response is pending");
            }
        }
        if let Some(pending) = &self.pending_technique {
            return ActionOutcome::conflict(format!(
                "Choose a target for {} first",
                self.card_name(&pending.card_id)
            ));
        }
        if let Some(rejection) = self.attack_rejection(player, attacker_slot, defender_slot) {
            return rejection;
        }

        self.pending_pierce = None;
        let defender = player.opponent();
        let attacker_name = self.unit_name(player, attacker_slot);

        let mut pending = match self.pending_attack.take() {
            Some(p) if p.matches(player, attacker_slot, defender_slot) => p,
            _ => {
                let target_name = self.unit_name(defender, defender_slot);
                self.log(format!("{attacker_name} attacks {target_name}"));
                PendingAttack::new(player, attacker_slot, defender_slot)
            }
        };

        let event = TriggerEvent::AttackDeclared {
            attacker: attacker_name.clone(),
        };
        loop {
            let next = self
                .check_traps(defender, &event)
                .into_iter()
                .find(|m| !pending.declined.contains(&m.slot));
            let Some(trap) = next else { break };

            pending.awaiting = Some(trap.slot);
            if self.is_ai(defender) {
                let activate = HeuristicController::new(defender).should_activate_trap(self, &trap);
                self.pending_attack = Some(pending.clone());
                let answered = self.answer_trap(defender, trap.slot, activate);
                match self.pending_attack.take() {
                    Some(p) => pending = p,
                    None => return answered,
                }
                if !answered.is_success() {
                    pending.awaiting = None;
                    pending.declined.push(trap.slot);
                }
                continue;
            }

            self.debug(format!("{defender} may answer with trap slot {}", trap.slot));
            let prompt = TrapPrompt {
                defender,
                trap_slot: trap.slot,
                trap: trap.card_id,
                trap_name: trap.name,
                cost: trap.cost,
                trigger_message: trap.trigger_message,
                pending_attack: pending.clone(),
            };
            self.pending_attack = Some(pending);
            return ActionOutcome::TrapInterrupt(prompt);
        }

        // A trap may have removed the attacker from play
        if self.unit_at(player, attacker_slot).is_none() || self.unit_at(defender, defender_slot).is_none() {
            return ActionOutcome::success(format!("{attacker_name}'s attack fizzled"));
        }

        let report = self.resolve_combat(player, attacker_slot, defender_slot);
        let message = match (report.defender_destroyed, report.attacker_destroyed) {
            (true, _) => format!("{attacker_name} won the fight"),
            (false, true) => format!("{attacker_name} was destroyed in the fight"),
            (false, false) => "Both units survived".to_string(),
        };
        ActionOutcome::combat(message, report)
    }

    fn combat_line(&mut self, report: &mut CombatReport, line: String) {
        self.log(&line);
        report.log.push(line);
    }

    fn resolve_combat(&mut self, player: PlayerId, attacker_slot: usize, defender_slot: usize) -> CombatReport {
        let defender = player.opponent();
        let mut report = CombatReport::default();

        let Some((attacker_card, attacker)) = self
            .unit_at(player, attacker_slot)
            .map(|(s, c)| (c.clone(), StatusEffectEngine::stats(s, c)))
        else {
            return report;
        };
        let Some((defender_card, target, defender_bound, defender_exhausted)) = self
            .unit_at(defender, defender_slot)
            .map(|(s, c)| (c.clone(), StatusEffectEngine::stats(s, c), s.no_retaliate, s.exhausted))
        else {
            return report;
        };

        let a_name = attacker_card.name.clone();
        let d_name = defender_card.name.clone();
        self.combat_line(
            &mut report,
            format!("{a_name} (ATK {}) strikes {d_name} (DEF {})", attacker.atk, target.def),
        );

        if attacker.atk > target.def {
            self.player_mut(defender).destroy_unit(defender_slot);
            report.defender_destroyed = true;
            self.combat_line(&mut report, format!("{d_name} was destroyed!"));
            self.on_enemy_destroyed(player, &mut report);
        } else {
            let half_turn = self.half_turn;
            if attacker_card.has_keyword(&Keyword::Wither) {
                if let Some(slot) = self.player_mut(defender).slot_mut(defender_slot) {
                    StatusEffectEngine::apply_wither(slot, 1, half_turn);
                    let stacks = slot.wither_stacks;
                    self.combat_line(&mut report, format!("{d_name} withers ({stacks} stacks)"));
                }
            }
            if attacker_card.has_keyword(&Keyword::Corrupt) {
                let corrupted = self
                    .player_mut(defender)
                    .slot_mut(defender_slot)
                    .is_some_and(|slot| StatusEffectEngine::apply_combat_corrupt(slot, half_turn));
                if corrupted {
                    self.combat_line(&mut report, format!("{d_name} is Corrupted"));
                }
            }

            if defender_bound {
                self.combat_line(&mut report, format!("{d_name} is bound and cannot retaliate"));
            } else if defender_exhausted {
                self.combat_line(&mut report, format!("{d_name} is exhausted and cannot retaliate"));
            } else if target.atk > attacker.def {
                self.player_mut(player).destroy_unit(attacker_slot);
                report.attacker_destroyed = true;
                self.combat_line(&mut report, format!("{d_name} retaliates and destroys {a_name}!"));
                self.on_enemy_destroyed(defender, &mut report);
                if let Some(FieldEffect::EnergyOnAttackerLost { faction }) = self.field_effect(player) {
                    if attacker_card.faction.is(&faction) {
                        self.player_mut(player).accrue_pending_energy();
                        let field = self.field_name(player);
                        self.combat_line(&mut report, format!("{field}: {player} will gain 1 energy next turn"));
                    }
                }
            } else {
                self.combat_line(&mut report, format!("{d_name} retaliates but {a_name} survives"));
            }
        }

        if !report.attacker_destroyed {
            if let Some(slot) = self.player_mut(player).slot_mut(attacker_slot) {
                slot.exhausted = true;
            }
        }

        if attacker_card.has_keyword(&Keyword::Pierce) && report.defender_destroyed && !report.attacker_destroyed {
            let overflow = attacker.atk - target.def;
            if overflow > 0 {
                report.pierce_available = true;
                report.pierce_damage = overflow;
                self.pending_pierce = Some(PendingPierce {
                    attacker_player: player,
                    damage: overflow,
                });
                self.combat_line(&mut report, format!("{a_name} can pierce for {overflow} damage"));
            }
        }

        report
    }

    /// Field payoff for `player` destroying an enemy unit
    fn on_enemy_destroyed(&mut self, player: PlayerId, report: &mut CombatReport) {
        if let Some(FieldEffect::EnergyOnEnemyDestroyed) = self.field_effect(player) {
            self.player_mut(player).accrue_pending_energy();
            let field = self.field_name(player);
            self.combat_line(report, format!("{field}: {player} will gain 1 energy next turn"));
        }
    }

    fn field_name(&self, player: PlayerId) -> String {
        self.player(player)
            .field
            .as_ref()
            .map(|f| self.card_name(f))
            .unwrap_or_default()
    }

    /// Spend Pierce overflow from the last attack on another defending unit
    ///
    /// The target is destroyed if `damage` reaches its effective DEF. Pierce
    /// damage never provokes retaliation.
    pub fn apply_pierce(&mut self, defending_player: PlayerId, target_slot: usize, damage: i32) -> ActionOutcome {
        if let Some(over) = self.game_over_outcome() {
            return over;
        }
        let Some(pending) = self.pending_pierce else {
            return ActionOutcome::not_found("No pierce damage is available");
        };
        if pending.attacker_player.opponent() != defending_player {
            return ActionOutcome::illegal("Pierce damage must target the defending player's units");
        }
        if damage <= 0 || damage > pending.damage {
            return ActionOutcome::illegal(format!(
                "Pierce damage must be between 1 and {}",
                pending.damage
            ));
        }
        let Some(stats) = self.unit_stats(defending_player, target_slot) else {
            return ActionOutcome::not_found("No unit in target slot");
        };

        let name = self.unit_name(defending_player, target_slot);
        self.pending_pierce = None;
        let mut report = CombatReport {
            pierce_damage: damage,
            ..CombatReport::default()
        };
        if damage >= stats.def {
            self.player_mut(defending_player).destroy_unit(target_slot);
            report.defender_destroyed = true;
            self.combat_line(&mut report, format!("Pierce deals {damage} to {name}: destroyed!"));
            self.on_enemy_destroyed(pending.attacker_player, &mut report);
            ActionOutcome::combat(format!("{name} was destroyed by pierce damage"), report)
        } else {
            self.combat_line(&mut report, format!("{name} withstands {damage} pierce damage"));
            ActionOutcome::combat(format!("{name} survived"), report)
        }
    }
}
