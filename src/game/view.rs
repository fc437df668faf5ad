//! Per-perspective snapshots of a game
//!
//! The engine keeps one authoritative [`GameState`]. What a player is shown
//! is a [`GameView`]: their own hand and face-down traps in full, and for the
//! opponent only counts in place of those hidden zones.

use crate::core::{CardDefinition, CardId, PlayerId, PlayerState};
use crate::game::status::StatusEffectEngine;
use crate::game::{
    GameEndReason, GameState, LogEntry, PendingPierce, PendingTechnique, Phase, TrapPrompt,
    TriggerEvent,
};
use serde::Serialize;

/// A unit on the battlefield with its current stats and statuses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitView {
    pub slot: usize,
    pub card: CardDefinition,
    pub atk: i32,
    pub def: i32,
    pub spd: i32,
    pub exhausted: bool,
    pub wither_stacks: i32,
    pub corrupt: bool,
    pub no_retaliate: bool,
    pub petrified: bool,
    pub atk_buff: i32,
    pub def_buff: i32,
    pub spd_buff: i32,
    pub deployed_turn: u32,
}

/// The viewing player's own side of the table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnView {
    pub energy: i32,
    pub control_loss: u32,
    pub must_discard: usize,
    pub rotfall_must_destroy: usize,
    pub hand: Vec<CardDefinition>,
    pub battlefield: Vec<Option<UnitView>>,
    pub field: Option<CardDefinition>,
    pub traps: Vec<Option<CardDefinition>>,
    pub deck_count: usize,
    pub discard: Vec<CardId>,
}

/// The opponent's side, with hand and trap identities hidden
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpponentView {
    pub energy: i32,
    pub control_loss: u32,
    pub rotfall_must_destroy: usize,
    pub hand_count: usize,
    pub battlefield: Vec<Option<UnitView>>,
    pub field: Option<CardDefinition>,
    pub trap_count: usize,
    pub deck_count: usize,
    pub discard: Vec<CardId>,
}

/// Everything one player is allowed to see
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameView {
    pub game_id: String,
    pub perspective: PlayerId,
    pub turn: u32,
    pub half_turn: u32,
    pub active_player: PlayerId,
    pub phase: Phase,
    pub winner: Option<PlayerId>,
    pub end_reason: Option<GameEndReason>,
    pub you: OwnView,
    pub opponent: OpponentView,
    /// Most recent log entries
    pub log: Vec<LogEntry>,
    /// Trap decision this player owes
    pub trap_prompt: Option<TrapPrompt>,
    /// Technique of this player's still waiting for a target
    pub pending_technique: Option<PendingTechnique>,
    /// Pierce overflow this player may assign
    pub pending_pierce: Option<PendingPierce>,
}

impl GameState {
    /// Snapshot of the game as `perspective` may see it
    pub fn view(&self, perspective: PlayerId) -> GameView {
        let tail = self.config.log_tail;
        GameView {
            game_id: self.game_id.to_string(),
            perspective,
            turn: self.turn,
            half_turn: self.half_turn,
            active_player: self.active_player,
            phase: self.phase,
            winner: self.winner,
            end_reason: self.end_reason,
            you: self.own_view(perspective),
            opponent: self.opponent_view(perspective.opponent()),
            log: self.logger.tail(tail).to_vec(),
            trap_prompt: self.trap_prompt_for(perspective),
            pending_technique: self
                .pending_technique
                .clone()
                .filter(|p| p.player == perspective),
            pending_pierce: self.pending_pierce.filter(|p| p.attacker_player == perspective),
        }
    }

    fn own_view(&self, player: PlayerId) -> OwnView {
        let state = self.player(player);
        OwnView {
            energy: state.energy,
            control_loss: state.control_loss,
            must_discard: state.must_discard,
            rotfall_must_destroy: state.rotfall_must_destroy,
            hand: state.hand.iter().filter_map(|id| self.card(id).cloned()).collect(),
            battlefield: self.battlefield_view(player),
            field: self.field_card(state),
            traps: state
                .traps
                .iter()
                .map(|t| t.as_ref().and_then(|id| self.card(id).cloned()))
                .collect(),
            deck_count: state.deck.len(),
            discard: state.discard.clone(),
        }
    }

    fn opponent_view(&self, player: PlayerId) -> OpponentView {
        let state = self.player(player);
        OpponentView {
            energy: state.energy,
            control_loss: state.control_loss,
            rotfall_must_destroy: state.rotfall_must_destroy,
            hand_count: state.hand.len(),
            battlefield: self.battlefield_view(player),
            field: self.field_card(state),
            trap_count: state.trap_count(),
            deck_count: state.deck.len(),
            discard: state.discard.clone(),
        }
    }

    fn field_card(&self, state: &PlayerState) -> Option<CardDefinition> {
        state.field.as_ref().and_then(|id| self.card(id).cloned())
    }

    fn battlefield_view(&self, player: PlayerId) -> Vec<Option<UnitView>> {
        (0..self.player(player).battlefield.len())
            .map(|slot| {
                self.unit_at(player, slot).map(|(state, card)| {
                    let stats = StatusEffectEngine::stats(state, card);
                    UnitView {
                        slot,
                        card: card.clone(),
                        atk: stats.atk,
                        def: stats.def,
                        spd: stats.spd,
                        exhausted: state.exhausted,
                        wither_stacks: state.wither_stacks,
                        corrupt: state.corrupt,
                        no_retaliate: state.no_retaliate,
                        petrified: state.no_attack,
                        atk_buff: state.atk_buff,
                        def_buff: state.def_buff,
                        spd_buff: state.spd_buff,
                        deployed_turn: state.deployed_turn,
                    }
                })
            })
            .collect()
    }

    /// The open trap prompt, if `player` is the defender who must answer it
    pub fn trap_prompt_for(&self, player: PlayerId) -> Option<TrapPrompt> {
        let pending = self.pending_attack.as_ref()?;
        let trap_slot = pending.awaiting?;
        let defender = pending.attacker_player.opponent();
        if defender != player {
            return None;
        }
        let trap = self.player(defender).traps.get(trap_slot)?.clone()?;
        let card = self.card(&trap)?;
        let event = TriggerEvent::AttackDeclared {
            attacker: self.unit_name(pending.attacker_player, pending.attacker_slot),
        };
        Some(TrapPrompt {
            defender,
            trap_slot,
            trap_name: card.name.clone(),
            cost: card.cost,
            trap,
            trigger_message: event.message(),
            pending_attack: pending.clone(),
        })
    }
}
