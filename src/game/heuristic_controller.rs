//! Heuristic AI controller
//!
//! Plays cards by a fixed type priority and attacks by scoring each legal
//! trade. It only uses the public game operations, so every action it takes
//! passes the same legality checks as a human's.

use crate::core::{CardDefinition, CardType, PlayerId};
use crate::game::status::{StatusEffectEngine, UnitStats};
use crate::game::traps::TrapMatch;
use crate::game::{ActionOutcome, GameState, ImmediateEffect, TargetClass, TargetedAction, TechniqueEffect};

/// Score for destroying the defender and surviving
pub const SCORE_CLEAN_KILL: i32 = 100;
/// Score for a trade where both units die
pub const SCORE_MUTUAL: i32 = 50;
/// Score for an exchange where nobody dies
pub const SCORE_CHIP: i32 = 10;
/// Score for losing the attacker without a kill
pub const SCORE_SUICIDE: i32 = -50;

/// Result of running the AI's combat phase
#[derive(Debug, Clone, PartialEq)]
pub enum CombatSegment {
    /// Every attack the AI wanted to make has resolved
    Completed,
    /// An attack is waiting on the opponent's trap decision
    Paused(ActionOutcome),
}

/// Heuristic AI for one seat
pub struct HeuristicController {
    player_id: PlayerId,
    /// Attacks scoring below this are skipped
    attack_threshold: i32,
    /// Energy kept back once a unit has been deployed this turn
    energy_reserve: i32,
}

impl HeuristicController {
    pub fn new(player_id: PlayerId) -> Self {
        HeuristicController {
            player_id,
            attack_threshold: -20,
            energy_reserve: 2,
        }
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    /// Deploy-phase priority: cheap units first, then fields, traps, techniques
    pub fn card_priority(card: &CardDefinition) -> i32 {
        match card.card_type {
            CardType::Unit => 100 - card.cost,
            CardType::Field => 50,
            CardType::Trap => 30,
            CardType::Technique => 20,
        }
    }

    /// Score an attack from effective stats
    ///
    /// Retaliation is judged on the defender's ATK against our DEF whether or
    /// not we destroy it, so an even trade scores below a clean kill.
    pub fn score_trade(attacker: UnitStats, defender: UnitStats, defender_can_retaliate: bool) -> i32 {
        let we_destroy = attacker.atk > defender.def;
        let we_die = defender_can_retaliate && defender.atk > attacker.def;
        match (we_destroy, we_die) {
            (true, false) => SCORE_CLEAN_KILL,
            (true, true) => SCORE_MUTUAL,
            (false, false) => SCORE_CHIP,
            (false, true) => SCORE_SUICIDE,
        }
    }

    /// Play cards from hand in priority order
    pub fn run_deploy(&self, game: &mut GameState) {
        let player = self.player_id;
        let mut candidates: Vec<CardDefinition> = game
            .player(player)
            .hand
            .iter()
            .filter_map(|id| game.card(id).cloned())
            .collect();
        candidates.sort_by_key(|card| std::cmp::Reverse(Self::card_priority(card)));

        for card in candidates {
            if game.is_over() {
                return;
            }
            if !game.player(player).has_in_hand(&card.id) || !self.wants_to_play(game, &card) {
                continue;
            }

            let target = match game.effects().technique(&card.id).cloned() {
                Some(effect @ TechniqueEffect::Targeted { .. }) => {
                    match self.choose_technique_target(game, &effect) {
                        Some(target) => Some(target),
                        None => continue,
                    }
                }
                _ => None,
            };

            let outcome = game.play_card(player, &card.id);
            game.debug(format!("{player} AI plays {}: {outcome:?}", card.name));
            if let (ActionOutcome::NeedsTarget { card_id, .. }, Some((target_player, slot))) = (&outcome, target) {
                game.apply_targeted_technique(player, card_id, target_player, slot);
            }

            if outcome.is_success() && card.is_unit() && game.player(player).energy < self.energy_reserve {
                break;
            }
        }
    }

    /// Capacity and usefulness checks before paying for a card
    fn wants_to_play(&self, game: &GameState, card: &CardDefinition) -> bool {
        let player = self.player_id;
        let state = game.player(player);
        if state.energy < game.actual_cost(player, card) {
            return false;
        }
        match card.card_type {
            CardType::Unit => {
                let room = state.first_empty_slot().is_some();
                let under_limit = game.board_limit().map_or(true, |limit| state.unit_count() < limit);
                room && under_limit
            }
            CardType::Field => state.field.is_none(),
            CardType::Trap => state.first_empty_trap_slot().is_some(),
            CardType::Technique => {
                let enemy = game.player(player.opponent());
                match game.effects().technique(&card.id) {
                    Some(TechniqueEffect::Immediate(ImmediateEffect::DestroyEnemyField)) => enemy.field.is_some(),
                    Some(TechniqueEffect::Immediate(
                        ImmediateEffect::WitherAllEnemies(_) | ImmediateEffect::ExhaustAllEnemies,
                    )) => enemy.unit_count() > 0,
                    Some(_) => true,
                    None => false,
                }
            }
        }
    }

    /// Where a targeted technique should land, if anywhere sensible
    ///
    /// Helpful effects go on our highest-ATK unit, harmful ones on the
    /// opponent's. Reboot only targets a unit that has something to clear.
    pub fn choose_technique_target(&self, game: &GameState, effect: &TechniqueEffect) -> Option<(PlayerId, usize)> {
        let TechniqueEffect::Targeted { target, actions } = effect else {
            return None;
        };
        let friendly = effect.prefers_friendly_target();
        let side = match (target, friendly) {
            (TargetClass::EnemyUnit, _) | (TargetClass::AnyUnit, false) => self.player_id.opponent(),
            (TargetClass::FriendlyUnit, _) | (TargetClass::AnyUnit, true) => self.player_id,
        };

        let eligible = |slot: usize| -> bool {
            let Some((state, _)) = game.unit_at(side, slot) else {
                return false;
            };
            actions.iter().all(|action| match action {
                TargetedAction::WitherIfCorrupt(_) => state.corrupt,
                TargetedAction::Reboot => {
                    state.wither_stacks > 0
                        || state.corrupt
                        || state.no_attack
                        || state.no_retaliate
                        || state.has_negative_buff()
                }
                TargetedAction::Ready => state.exhausted,
                _ => true,
            })
        };
        Self::highest_atk(game, side, eligible).map(|slot| (side, slot))
    }

    /// Attack with every ready unit, best trade first per attacker
    pub fn run_combat(&self, game: &mut GameState) -> CombatSegment {
        let player = self.player_id;
        if game.turn <= 1 {
            game.log(format!("{player} skips combat on the first turn"));
            return CombatSegment::Completed;
        }

        for attacker_slot in 0..game.player(player).battlefield.len() {
            if game.is_over() {
                break;
            }
            let Some(defender_slot) = self.choose_attack(game, attacker_slot) else {
                continue;
            };
            let outcome = game.attack(player, attacker_slot, defender_slot);
            match outcome {
                ActionOutcome::TrapInterrupt(_) => return CombatSegment::Paused(outcome),
                ActionOutcome::Success {
                    combat: Some(report), ..
                } if report.pierce_available => {
                    self.spend_pierce(game, report.pierce_damage);
                }
                _ => {}
            }
        }
        CombatSegment::Completed
    }

    /// Best-scoring legal target for one attacker, or `None` if nothing is worth it
    pub fn choose_attack(&self, game: &GameState, attacker_slot: usize) -> Option<usize> {
        let player = self.player_id;
        let enemy = player.opponent();
        let attacker = game.unit_stats(player, attacker_slot)?;

        let mut best: Option<(usize, i32)> = None;
        for defender_slot in game.legal_attack_targets(player, attacker_slot) {
            let Some((state, card)) = game.unit_at(enemy, defender_slot) else {
                continue;
            };
            let defender = StatusEffectEngine::stats(state, card);
            let can_retaliate = !state.no_retaliate && !state.exhausted;
            let score = Self::score_trade(attacker, defender, can_retaliate);
            game.debug(format!(
                "{player} AI scores slot {attacker_slot} -> {defender_slot}: {score}"
            ));
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((defender_slot, score));
            }
        }
        best.filter(|&(_, score)| score >= self.attack_threshold)
            .map(|(slot, _)| slot)
    }

    fn spend_pierce(&self, game: &mut GameState, damage: i32) {
        let enemy = self.player_id.opponent();
        if let Some(slot) = self.choose_pierce_target(game, damage) {
            game.apply_pierce(enemy, slot, damage);
        }
    }

    /// Highest-ATK enemy that `damage` destroys
    pub fn choose_pierce_target(&self, game: &GameState, damage: i32) -> Option<usize> {
        let enemy = self.player_id.opponent();
        Self::highest_atk(game, enemy, |slot| {
            game.unit_stats(enemy, slot).is_some_and(|s| damage >= s.def)
        })
    }

    /// Activate any trap we can pay for
    pub fn should_activate_trap(&self, game: &GameState, trap: &TrapMatch) -> bool {
        game.player(self.player_id).energy >= trap.cost
    }

    /// Unit to give up to a board-size limit: lowest printed ATK, then lowest slot
    pub fn choose_overage_victim(&self, game: &GameState) -> Option<usize> {
        let player = self.player_id;
        game.player(player)
            .occupied_slots()
            .filter_map(|slot| game.unit_at(player, slot).map(|(_, card)| (slot, card.base_atk())))
            .min_by_key(|&(slot, atk)| (atk, slot))
            .map(|(slot, _)| slot)
    }

    /// Hand index to discard for the hand limit: most expensive card first
    pub fn choose_discard(&self, game: &GameState) -> Option<usize> {
        let state = game.player(self.player_id);
        state
            .hand
            .iter()
            .enumerate()
            .map(|(index, id)| (index, game.card(id).map_or(0, |c| c.cost)))
            .min_by_key(|&(index, cost)| (std::cmp::Reverse(cost), index))
            .map(|(index, _)| index)
    }

    fn highest_atk(game: &GameState, side: PlayerId, mut accept: impl FnMut(usize) -> bool) -> Option<usize> {
        game.player(side)
            .occupied_slots()
            .filter(|&slot| accept(slot))
            .filter_map(|slot| game.unit_stats(side, slot).map(|s| (slot, s.atk)))
            .min_by_key(|&(slot, atk)| (std::cmp::Reverse(atk), slot))
            .map(|(slot, _)| slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CardId;
    use crate::game::test_util::*;
    use crate::game::{ControllerKind, GameConfig, Phase};

    const P0: PlayerId = PlayerId::FIRST;
    const P1: PlayerId = PlayerId::SECOND;

    fn stats(atk: i32, def: i32) -> UnitStats {
        UnitStats { atk, def, spd: 1 }
    }

    #[test]
    fn test_score_trade_table() {
        assert_eq!(HeuristicController::score_trade(stats(4, 3), stats(1, 3), true), SCORE_CLEAN_KILL);
        assert_eq!(HeuristicController::score_trade(stats(4, 3), stats(4, 3), true), SCORE_MUTUAL);
        assert_eq!(HeuristicController::score_trade(stats(1, 3), stats(1, 3), true), SCORE_CHIP);
        assert_eq!(HeuristicController::score_trade(stats(1, 3), stats(4, 3), true), SCORE_SUICIDE);
        assert_eq!(HeuristicController::score_trade(stats(1, 3), stats(4, 3), false), SCORE_CHIP);
    }

    #[test]
    fn test_priority_order() {
        let catalog = test_catalog();
        let get = |id: &str| catalog.get_by_str(id).cloned().unwrap();
        let cheap = HeuristicController::card_priority(&get("t_glass"));
        let pricey = HeuristicController::card_priority(&get("t_lance"));
        let field = HeuristicController::card_priority(&get("skyforge_relay_node"));
        let trap = HeuristicController::card_priority(&get("generic_false_step"));
        let technique = HeuristicController::card_priority(&get("generic_arcane_surge"));
        assert!(cheap > pricey && pricey > field && field > trap && trap > technique);
    }

    #[test]
    fn test_deploy_plays_cheapest_units_and_reserves_energy() {
        let mut game = deploy_game();
        for id in ["t_lance", "t_brute", "t_glass"] {
            give(&mut game, P0, id);
        }
        HeuristicController::new(P0).run_deploy(&mut game);
        let state = game.player(P0);
        // Glass (1) then Brute (2) leaves 2 energy; Lance (4) is unaffordable
        assert_eq!(state.battlefield[0].occupant, Some(CardId::new("t_glass")));
        assert_eq!(state.battlefield[1].occupant, Some(CardId::new("t_brute")));
        assert_eq!(state.energy, 2);
        assert!(state.has_in_hand(&CardId::new("t_lance")));
    }

    #[test]
    fn test_deploy_stops_when_reserve_would_break() {
        let mut game = deploy_game();
        give(&mut game, P0, "t_lance");
        give(&mut game, P0, "t_glass");
        give(&mut game, P0, "generic_false_step");
        HeuristicController::new(P0).run_deploy(&mut game);
        // Glass leaves 4, Lance leaves 0 and ends the phase before the trap
        assert!(game.player(P0).has_in_hand(&CardId::new("generic_false_step")));
        assert_eq!(game.player(P0).unit_count(), 2);
        assert_eq!(game.player(P0).energy, 0);
    }

    #[test]
    fn test_deploy_skips_useless_techniques() {
        let mut game = deploy_game();
        give(&mut game, P0, "generic_eviction_notice");
        give(&mut game, P0, "miasma_toxic_sludge");
        place(&mut game, P1, 0, "t_brute");
        HeuristicController::new(P0).run_deploy(&mut game);
        assert_eq!(game.player(P0).hand.len(), 2);
        assert_eq!(game.player(P0).energy, 5);
    }

    #[test]
    fn test_deploy_targets_techniques() {
        let mut game = deploy_game();
        place(&mut game, P0, 0, "t_wall");
        place(&mut game, P0, 1, "t_brute");
        place(&mut game, P1, 0, "t_glass");
        place(&mut game, P1, 1, "t_lance");
        give(&mut game, P0, "generic_food_rations");
        give(&mut game, P0, "generic_veil_of_binding");
        HeuristicController::new(P0).run_deploy(&mut game);
        assert_eq!(game.player(P0).battlefield[1].def_buff, 1);
        assert!(game.player(P1).battlefield[1].no_retaliate);
        assert!(game.pending_technique.is_none());
    }

    #[test]
    fn test_choose_attack_prefers_clean_kill() {
        let mut game = combat_game();
        place(&mut game, P0, 0, "t_fast");
        place(&mut game, P1, 0, "t_brute");
        place(&mut game, P1, 1, "t_glass");
        let ai = HeuristicController::new(P0);
        assert_eq!(ai.choose_attack(&game, 0), Some(1));
    }

    #[test]
    fn test_choose_attack_refuses_suicide() {
        let mut game = combat_game();
        place(&mut game, P0, 0, "t_glass");
        place(&mut game, P1, 0, "t_lance");
        assert_eq!(HeuristicController::new(P0).choose_attack(&game, 0), None);
    }

    #[test]
    fn test_combat_skipped_on_turn_one() {
        let mut game = combat_game();
        game.turn = 1;
        place(&mut game, P0, 0, "t_fast");
        place(&mut game, P1, 0, "t_glass");
        assert_eq!(HeuristicController::new(P0).run_combat(&mut game), CombatSegment::Completed);
        assert!(game.player(P1).battlefield[0].is_occupied());
    }

    #[test]
    fn test_combat_spends_pierce() {
        let mut game = combat_game();
        place(&mut game, P0, 0, "t_lance");
        place(&mut game, P1, 0, "t_glass");
        place(&mut game, P1, 1, "t_wall");
        game.player_mut(P1).battlefield[1].exhausted = true;
        HeuristicController::new(P0).run_combat(&mut game);
        // Lance (5) kills Glass (DEF 1), 4 overflow kills Wall (DEF 3)
        assert_eq!(game.player(P1).unit_count(), 0);
        assert!(game.pending_pierce.is_none());
    }

    #[test]
    fn test_combat_pauses_on_human_trap() {
        let mut game = combat_game();
        place(&mut game, P0, 0, "t_fast");
        place(&mut game, P1, 0, "t_glass");
        game.player_mut(P1).traps[0] = Some(CardId::new("generic_false_step"));
        let segment = HeuristicController::new(P0).run_combat(&mut game);
        assert!(matches!(segment, CombatSegment::Paused(ActionOutcome::TrapInterrupt(_))));
    }

    #[test]
    fn test_ai_seat_runs_inside_advance() {
        let config = GameConfig::human_vs_human().with_controller(P0, ControllerKind::Heuristic);
        let mut game = test_game(config);
        game.turn = 2;
        game.phase = Phase::Deploy;
        give(&mut game, P0, "t_glass");
        game.advance();
        assert_eq!(game.phase, Phase::Combat);
        assert_eq!(game.player(P0).unit_count(), 1);
    }

    #[test]
    fn test_overage_and_discard_choices() {
        let mut game = deploy_game();
        place(&mut game, P0, 0, "t_brute");
        place(&mut game, P0, 1, "t_glass");
        place(&mut game, P0, 2, "t_wall");
        let ai = HeuristicController::new(P0);
        assert_eq!(ai.choose_overage_victim(&game), Some(1));

        give(&mut game, P0, "t_glass");
        give(&mut game, P0, "t_lance");
        give(&mut game, P0, "t_brute");
        assert_eq!(ai.choose_discard(&game), Some(1));
    }

    #[test]
    fn test_overage_victim_ignores_temporary_buffs() {
        let mut game = deploy_game();
        place(&mut game, P0, 0, "t_brute");
        place(&mut game, P0, 1, "t_glass");
        game.player_mut(P0).battlefield[1].atk_buff = 4;
        let ai = HeuristicController::new(P0);
        assert_eq!(ai.choose_overage_victim(&game), Some(1));
    }
}
