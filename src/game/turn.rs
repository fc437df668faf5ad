//! Turn and phase sequencing
//!
//! `advance` walks start → deploy → combat → end. Ending a turn runs the
//! cleanup steps in a fixed order and can be blocked by a pending discard or
//! board-size destroy; re-issuing it after the block is resolved continues
//! where it stopped.

use crate::core::PlayerId;
use crate::game::heuristic_controller::{CombatSegment, HeuristicController};
use crate::game::status::StatusEffectEngine;
use crate::game::{ActionOutcome, FieldEffect, GameEndReason, GameState, Phase};

impl GameState {
    /// Move to the next phase, letting an AI seat act in its deploy and combat phases
    pub fn advance(&mut self) -> ActionOutcome {
        if let Some(over) = self.game_over_outcome() {
            return over;
        }
        if self.pending_attack.as_ref().is_some_and(|p| p.awaiting.is_some()) {
            return ActionOutcome::conflict("A trap response is pending");
        }
        if let Some(pending) = self.pending_technique.take() {
            let name = self.card_name(&pending.card_id);
            self.log(format!("{name} fizzled without a target"));
        }
        self.pending_pierce = None;
        self.pending_attack = None;

        let player = self.active_player;
        match self.phase {
            Phase::Start => {
                self.phase = Phase::Deploy;
            }
            Phase::Deploy => {
                if self.is_ai(player) {
                    HeuristicController::new(player).run_deploy(self);
                    if let Some(over) = self.game_over_outcome() {
                        return over;
                    }
                }
                self.phase = Phase::Combat;
            }
            Phase::Combat => {
                if self.is_ai(player) {
                    if let CombatSegment::Paused(prompt) = HeuristicController::new(player).run_combat(self) {
                        return prompt;
                    }
                    if let Some(over) = self.game_over_outcome() {
                        return over;
                    }
                }
                self.phase = Phase::End;
            }
            Phase::End => return self.end_turn(),
        }
        self.debug(format!("{player} enters the {} phase", self.phase));
        ActionOutcome::success(format!("{} phase", self.phase))
    }

    /// Finish the active player's turn and start the opponent's
    pub fn end_turn(&mut self) -> ActionOutcome {
        if let Some(over) = self.game_over_outcome() {
            return over;
        }
        let player = self.active_player;

        if !self.end_of_turn_applied {
            self.end_of_turn_applied = true;
            let turn = self.turn;
            let half_turn = self.half_turn;
            for p in PlayerId::both() {
                let expired = StatusEffectEngine::expire_override(self.player_mut(p), turn);
                if expired > 0 {
                    self.log(format!("Override expired on {expired} of {p}'s units"));
                }
            }
            StatusEffectEngine::expire_end_of_turn(self.player_mut(player), half_turn);

            if let Some(over) = self.check_control_loss(player) {
                return over;
            }
        }

        if let Some(limit) = self.board_limit() {
            for p in PlayerId::both() {
                let count = self.player(p).unit_count();
                if count <= limit {
                    self.player_mut(p).rotfall_must_destroy = 0;
                    continue;
                }
                let excess = count - limit;
                if self.is_ai(p) {
                    self.log(format!("{p} has {count} units and destroys {excess}"));
                    for _ in 0..excess {
                        if let Some(slot) = HeuristicController::new(p).choose_overage_victim(self) {
                            let name = self.unit_name(p, slot);
                            self.player_mut(p).destroy_unit(slot);
                            self.log(format!("{p} destroys {name}"));
                        }
                    }
                } else {
                    self.player_mut(p).rotfall_must_destroy = excess;
                    self.log(format!("{p} has {count} units and must destroy {excess}"));
                    return ActionOutcome::conflict(format!(
                        "{p} must destroy {excess} unit(s) before the turn can end"
                    ));
                }
            }
        }

        let cap = self.config.energy_cap;
        let state = self.player_mut(player);
        state.energy = state.energy.min(cap);

        let hand_limit = self.config.hand_limit;
        let hand_size = self.player(player).hand.len();
        if hand_size > hand_limit {
            let excess = hand_size - hand_limit;
            if self.is_ai(player) {
                for _ in 0..excess {
                    if let Some(index) = HeuristicController::new(player).choose_discard(self) {
                        let card = self.player_mut(player).hand.remove(index);
                        let name = self.card_name(&card);
                        self.player_mut(player).discard.push(card);
                        self.log(format!("{player} discards {name}"));
                    }
                }
            } else {
                let state = self.player_mut(player);
                let first_block = state.must_discard == 0;
                state.must_discard = excess;
                if first_block {
                    self.log(format!("{player} has {hand_size} cards and must discard {excess}"));
                }
                return ActionOutcome::conflict(format!(
                    "Discard {excess} card(s) before ending the turn"
                ));
            }
        }
        self.player_mut(player).must_discard = 0;

        let next = player.opponent();
        self.active_player = next;
        if next == PlayerId::FIRST {
            self.turn += 1;
        }
        self.end_of_turn_applied = false;
        self.phase = Phase::Start;
        self.start_turn()
    }

    /// Count an empty-board turn end, or clear the counter
    fn check_control_loss(&mut self, player: PlayerId) -> Option<ActionOutcome> {
        let limit = self.config.control_loss_limit;
        if self.player(player).unit_count() > 0 {
            let state = self.player_mut(player);
            if state.control_loss > 0 {
                state.control_loss = 0;
                self.log(format!("{player} clears Control Loss tokens"));
            }
            return None;
        }

        let state = self.player_mut(player);
        state.control_loss += 1;
        let tokens = state.control_loss;
        self.log(format!("{player} gains Control Loss token ({tokens}/{limit})"));
        if tokens < limit {
            return None;
        }
        self.log(format!("{player} loses! {limit} Control Loss tokens!"));
        self.declare_winner(player.opponent(), GameEndReason::ControlLoss(player));
        self.game_over_outcome()
    }

    /// Start-of-turn housekeeping for the (new) active player
    pub(crate) fn start_turn(&mut self) -> ActionOutcome {
        self.half_turn += 1;
        let player = self.active_player;

        StatusEffectEngine::expire_start_of_turn(self.player_mut(player));
        for p in PlayerId::both() {
            StatusEffectEngine::apply_queued_exhaustion(self.player_mut(p));
        }

        if !self.draw_cards(player, 1) {
            return ActionOutcome::GameOver {
                winner: player.opponent(),
            };
        }

        let gain = self.config.energy_per_turn;
        let state = self.player_mut(player);
        if state.skip_next_energy_gain {
            state.skip_next_energy_gain = false;
            self.log(format!("{player} gains no energy this turn"));
        } else {
            state.energy += gain;
        }

        let state = self.player_mut(player);
        let pending = std::mem::take(&mut state.pending_energy);
        if pending > 0 {
            state.energy += pending;
            self.log(format!("{player} gains {pending} energy from a field effect"));
        }

        self.start_of_turn_auras(player);

        StatusEffectEngine::ready_all(self.player_mut(player));
        self.log(format!("Turn {} - {player}'s turn begins", self.turn));
        self.phase = Phase::Deploy;
        ActionOutcome::success(format!("{player}'s turn"))
    }

    fn start_of_turn_auras(&mut self, player: PlayerId) {
        match self.field_effect(player) {
            Some(FieldEffect::StartOfTurnEnergy { faction, amount, below }) => {
                let has_unit = self.player(player).occupied_slots().any(|slot| {
                    self.unit_at(player, slot)
                        .is_some_and(|(_, card)| card.faction.is(&faction))
                });
                if has_unit && self.player(player).energy < below {
                    self.player_mut(player).energy += amount;
                    self.log(format!("{player} gains {amount} energy from its field"));
                }
            }
            Some(FieldEffect::StartOfTurnWitherEnemies(stacks)) => {
                let half_turn = self.half_turn;
                let enemy = player.opponent();
                let mut hit = 0;
                for slot in self.player_mut(enemy).battlefield.iter_mut().filter(|s| s.is_occupied()) {
                    StatusEffectEngine::apply_wither(slot, stacks, half_turn);
                    hit += 1;
                }
                if hit > 0 {
                    self.log(format!("{hit} of {enemy}'s units wither"));
                }
            }
            _ => {}
        }
    }

    /// Discard the hand card at `index` to satisfy the hand limit
    pub fn discard_for_hand_limit(&mut self, player: PlayerId, index: usize) -> ActionOutcome {
        if let Some(over) = self.game_over_outcome() {
            return over;
        }
        let state = self.player(player);
        if state.must_discard == 0 {
            return ActionOutcome::conflict("No discard is required");
        }
        if index >= state.hand.len() {
            return ActionOutcome::not_found(format!("No card at hand index {index}"));
        }

        let state = self.player_mut(player);
        let card = state.hand.remove(index);
        state.discard.push(card.clone());
        state.must_discard -= 1;
        let remaining = state.must_discard;
        let name = self.card_name(&card);
        self.log(format!("{player} discards {name}"));
        ActionOutcome::success(if remaining > 0 {
            format!("Discarded {name}; {remaining} more to discard")
        } else {
            format!("Discarded {name}")
        })
    }

    /// Destroy one of `player`'s units to get under a board-size limit
    pub fn resolve_board_overage(&mut self, player: PlayerId, slot: usize) -> ActionOutcome {
        if let Some(over) = self.game_over_outcome() {
            return over;
        }
        if self.player(player).rotfall_must_destroy == 0 {
            return ActionOutcome::conflict("No unit needs to be destroyed");
        }
        if self.unit_at(player, slot).is_none() {
            return ActionOutcome::not_found("No unit in that slot");
        }

        let name = self.unit_name(player, slot);
        let state = self.player_mut(player);
        state.destroy_unit(slot);
        state.rotfall_must_destroy -= 1;
        self.log(format!("{player} destroys {name}"));
        ActionOutcome::success(format!("Destroyed {name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CardId;
    use crate::game::test_util::*;
    use crate::game::{ErrorCategory, GameConfig};

    const P0: PlayerId = PlayerId::FIRST;
    const P1: PlayerId = PlayerId::SECOND;

    fn end_game() -> GameState {
        let mut game = deploy_game();
        game.phase = Phase::End;
        game
    }

    #[test]
    fn test_phase_order() {
        let mut game = test_game(GameConfig::human_vs_human());
        assert_eq!(game.phase, Phase::Start);
        game.advance();
        assert_eq!(game.phase, Phase::Deploy);
        game.advance();
        assert_eq!(game.phase, Phase::Combat);
        game.advance();
        assert_eq!(game.phase, Phase::End);
        place(&mut game, P0, 0, "t_wall");
        assert!(game.advance().is_success());
        assert_eq!(game.active_player, P1);
        assert_eq!(game.turn, 1);
        assert_eq!(game.half_turn, 2);
        assert_eq!(game.phase, Phase::Deploy);
    }

    #[test]
    fn test_turn_increments_when_first_player_returns() {
        let mut game = end_game();
        place(&mut game, P0, 0, "t_wall");
        place(&mut game, P1, 0, "t_wall");
        game.end_turn();
        assert_eq!((game.turn, game.active_player), (2, P1));
        game.phase = Phase::End;
        game.end_turn();
        assert_eq!((game.turn, game.active_player), (3, P0));
    }

    #[test]
    fn test_start_turn_draws_and_gains_energy() {
        let mut game = end_game();
        place(&mut game, P0, 0, "t_wall");
        let deck_before = game.player(P1).deck.len();
        game.player_mut(P1).energy = 1;
        game.end_turn();
        let state = game.player(P1);
        assert_eq!(state.hand.len(), 1);
        assert_eq!(state.deck.len(), deck_before - 1);
        assert_eq!(state.energy, 3);
    }

    #[test]
    fn test_skip_energy_and_pending_energy() {
        let mut game = end_game();
        place(&mut game, P0, 0, "t_wall");
        let state = game.player_mut(P1);
        state.energy = 0;
        state.skip_next_energy_gain = true;
        state.pending_energy = 1;
        game.end_turn();
        let state = game.player(P1);
        assert_eq!(state.energy, 1);
        assert!(!state.skip_next_energy_gain);
        assert_eq!(state.pending_energy, 0);
    }

    #[test]
    fn test_energy_clamped_at_turn_end() {
        let mut game = end_game();
        place(&mut game, P0, 0, "t_wall");
        game.player_mut(P0).energy = 9;
        game.end_turn();
        assert_eq!(game.player(P0).energy, 5);
    }

    #[test]
    fn test_deck_out_loses() {
        let mut game = end_game();
        place(&mut game, P0, 0, "t_wall");
        game.player_mut(P1).deck.clear();
        let outcome = game.end_turn();
        assert_eq!(outcome, ActionOutcome::GameOver { winner: P0 });
        assert_eq!(game.end_reason, Some(GameEndReason::Decking(P1)));
        assert_eq!(game.advance(), ActionOutcome::GameOver { winner: P0 });
    }

    #[test]
    fn test_control_loss_three_strikes() {
        let mut game = end_game();
        for strike in 1..=2 {
            game.active_player = P0;
            game.phase = Phase::End;
            assert!(game.end_turn().is_success());
            assert_eq!(game.player(P0).control_loss, strike);
        }
        game.active_player = P0;
        game.phase = Phase::End;
        assert_eq!(game.end_turn(), ActionOutcome::GameOver { winner: P1 });
        assert_eq!(game.end_reason, Some(GameEndReason::ControlLoss(P0)));
    }

    #[test]
    fn test_control_loss_resets_with_a_unit() {
        let mut game = end_game();
        game.player_mut(P0).control_loss = 2;
        place(&mut game, P0, 0, "t_wall");
        game.end_turn();
        assert_eq!(game.player(P0).control_loss, 0);
    }

    #[test]
    fn test_hand_limit_blocks_until_discarded() {
        let mut game = end_game();
        place(&mut game, P0, 0, "t_wall");
        for _ in 0..9 {
            give(&mut game, P0, "t_brute");
        }
        let outcome = game.end_turn();
        assert_eq!(outcome.error_category(), Some(ErrorCategory::StateConflict));
        assert_eq!(game.player(P0).must_discard, 2);
        assert_eq!(game.active_player, P0);

        // Blocked re-issue does not stack control-loss or expiry work
        game.end_turn();
        assert_eq!(game.player(P0).control_loss, 0);

        assert!(game.discard_for_hand_limit(P0, 0).is_success());
        assert_eq!(game.end_turn().error_category(), Some(ErrorCategory::StateConflict));
        assert_eq!(game.player(P0).must_discard, 1);
        assert!(game.discard_for_hand_limit(P0, 0).is_success());
        assert!(game.end_turn().is_success());
        assert_eq!(game.active_player, P1);
        assert_eq!(game.player(P0).hand.len(), 7);
        assert_eq!(game.player(P0).discard.len(), 2);
    }

    #[test]
    fn test_discard_without_requirement() {
        let mut game = end_game();
        give(&mut game, P0, "t_brute");
        assert_eq!(
            game.discard_for_hand_limit(P0, 0).error_category(),
            Some(ErrorCategory::StateConflict)
        );
    }

    #[test]
    fn test_board_limit_blocks_human() {
        let mut game = end_game();
        game.player_mut(P1).field = Some(CardId::new("miasma_rotfall_expanse"));
        for slot in 0..4 {
            place(&mut game, P0, slot, "t_wall");
        }
        assert_eq!(game.end_turn().error_category(), Some(ErrorCategory::StateConflict));
        assert_eq!(game.player(P0).rotfall_must_destroy, 1);
        assert_eq!(
            game.resolve_board_overage(P0, 4).error_category(),
            Some(ErrorCategory::NotFound)
        );
        assert!(game.resolve_board_overage(P0, 2).is_success());
        assert!(game.end_turn().is_success());
        assert_eq!(game.player(P0).unit_count(), 3);
    }

    #[test]
    fn test_board_limit_ai_destroys_lowest_atk() {
        let mut game = test_game(GameConfig::human_vs_human().with_controller(P1, crate::game::ControllerKind::Heuristic));
        game.turn = 2;
        game.phase = Phase::End;
        game.player_mut(P0).field = Some(CardId::new("miasma_rotfall_expanse"));
        place(&mut game, P0, 0, "t_brute");
        place(&mut game, P1, 0, "t_brute");
        place(&mut game, P1, 1, "t_wall");
        place(&mut game, P1, 2, "t_brute");
        place(&mut game, P1, 3, "t_glass");
        assert!(game.end_turn().is_success());
        let enemy = game.player(P1);
        assert_eq!(enemy.unit_count(), 3);
        assert!(enemy.battlefield[1].is_empty());
        assert!(enemy.battlefield[3].is_occupied());
    }

    #[test]
    fn test_wither_lasts_until_holders_next_turn() {
        let mut game = end_game();
        place(&mut game, P0, 0, "t_wall");
        place(&mut game, P1, 0, "t_wall");
        let half_turn = game.half_turn;
        StatusEffectEngine::apply_wither(&mut game.player_mut(P1).battlefield[0], 1, half_turn);
        StatusEffectEngine::apply_wither(&mut game.player_mut(P0).battlefield[0], 1, half_turn);

        game.end_turn();
        assert_eq!(game.player(P1).battlefield[0].wither_stacks, 0);
        assert_eq!(game.player(P0).battlefield[0].wither_stacks, 1);
        game.phase = Phase::End;
        game.end_turn();
        assert_eq!(game.player(P0).battlefield[0].wither_stacks, 0);
    }

    #[test]
    fn test_units_ready_at_turn_start() {
        let mut game = end_game();
        place(&mut game, P0, 0, "t_wall");
        place(&mut game, P1, 0, "t_wall");
        game.player_mut(P1).battlefield[0].exhausted = true;
        game.end_turn();
        assert!(!game.player(P1).battlefield[0].exhausted);
    }

    #[test]
    fn test_queued_exhaustion_hits_at_next_turn_start() {
        let mut game = end_game();
        place(&mut game, P0, 0, "t_wall");
        game.player_mut(P0).battlefield[0].enters_exhausted_next_turn = true;
        game.end_turn();
        assert!(game.player(P0).battlefield[0].exhausted);
        assert!(!game.player(P0).battlefield[0].enters_exhausted_next_turn);
    }

    #[test]
    fn test_override_expires_when_casters_turn_ends() {
        let mut game = end_game();
        place(&mut game, P0, 0, "t_wall");
        place(&mut game, P1, 0, "t_wall");
        let turn = game.turn;
        StatusEffectEngine::apply_override(&mut game.player_mut(P1).battlefield[0], turn);
        game.end_turn();
        assert!(!game.player(P1).battlefield[0].corrupt);
    }

    #[test]
    fn test_override_on_own_unit_expires_when_casters_turn_ends() {
        let mut game = deploy_game();
        place(&mut game, P0, 0, "t_wall");
        give(&mut game, P0, "skyforge_override");
        game.play_card(P0, &CardId::new("skyforge_override"));
        game.apply_targeted_technique(P0, &CardId::new("skyforge_override"), P0, 0);
        assert!(game.player(P0).battlefield[0].corrupt);
        game.phase = Phase::End;
        game.end_turn();
        assert!(!game.player(P0).battlefield[0].corrupt);
        assert_eq!(game.player(P0).battlefield[0].override_expires_turn, 0);
    }

    #[test]
    fn test_petrify_cleared_at_holders_turn_start() {
        let mut game = deploy_game();
        place(&mut game, P0, 0, "t_wall");
        place(&mut game, P1, 0, "t_brute");
        give(&mut game, P0, "miasma_petrify");
        game.play_card(P0, &CardId::new("miasma_petrify"));
        assert!(game
            .apply_targeted_technique(P0, &CardId::new("miasma_petrify"), P1, 0)
            .is_success());
        assert!(game.player(P1).battlefield[0].no_attack);

        game.phase = Phase::End;
        game.end_turn();
        assert_eq!(game.active_player, P1);
        assert!(!game.player(P1).battlefield[0].no_attack);
    }

    #[test]
    fn test_relay_node_and_lowlands_mist() {
        let mut game = end_game();
        place(&mut game, P0, 0, "t_wall");
        place(&mut game, P1, 0, "t_skyforge");
        game.player_mut(P1).field = Some(CardId::new("skyforge_relay_node"));
        game.player_mut(P1).energy = 1;
        game.end_turn();
        assert_eq!(game.player(P1).energy, 4);

        let mut game = end_game();
        place(&mut game, P0, 0, "t_wall");
        place(&mut game, P0, 1, "t_brute");
        game.player_mut(P1).field = Some(CardId::new("miasma_lowlands_mist"));
        game.end_turn();
        assert_eq!(game.player(P0).battlefield[0].wither_stacks, 1);
        assert_eq!(game.player(P0).battlefield[1].wither_stacks, 1);
    }

    #[test]
    fn test_advance_fizzles_pending_technique() {
        let mut game = deploy_game();
        place(&mut game, P0, 0, "t_wall");
        give(&mut game, P0, "generic_food_rations");
        game.play_card(P0, &CardId::new("generic_food_rations"));
        assert!(game.pending_technique.is_some());
        game.advance();
        assert!(game.pending_technique.is_none());
        assert_eq!(game.phase, Phase::Combat);
    }
}
