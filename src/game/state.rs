//! Main game state structure

use crate::core::{BattlefieldSlot, CardDefinition, CardId, GameId, PlayerId, PlayerState};
use crate::game::{
    ActionOutcome, ControllerKind, EffectRegistry, FieldEffect, GameConfig, GameEndReason,
    GameLogger, PendingAttack, PendingPierce, PendingTechnique, Phase,
};
use crate::loader::CardCatalog;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::Serialize;
use std::sync::Arc;

/// Complete state of one game
///
/// Owns both players outright. The card catalog and effect registry are
/// shared with every other game and are never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    pub game_id: GameId,

    /// Shared turn number; increments when play returns to the first player
    pub turn: u32,

    /// Increments at every turn start, for Wither and Corrupt timing
    pub half_turn: u32,

    pub active_player: PlayerId,

    pub phase: Phase,

    /// Set once; the game is over from then on
    pub winner: Option<PlayerId>,

    pub end_reason: Option<GameEndReason>,

    pub players: [PlayerState; 2],

    pub config: GameConfig,

    /// Attack paused on a trap prompt
    pub pending_attack: Option<PendingAttack>,

    /// Targeted technique waiting for its target
    pub pending_technique: Option<PendingTechnique>,

    /// Pierce overflow from the last attack
    pub pending_pierce: Option<PendingPierce>,

    /// End-of-turn expiry and control-loss steps ran for this turn already
    pub end_of_turn_applied: bool,

    /// Game log
    pub logger: GameLogger,

    /// Deck shuffling RNG; serialized so a game can be replayed exactly
    rng: ChaCha12Rng,

    #[serde(skip)]
    catalog: Arc<CardCatalog>,

    #[serde(skip)]
    effects: Arc<EffectRegistry>,
}

impl GameState {
    /// Create a game with empty decks, ready for [`crate::loader::GameInitializer`]
    pub fn new(
        game_id: GameId,
        catalog: Arc<CardCatalog>,
        effects: Arc<EffectRegistry>,
        config: GameConfig,
    ) -> Self {
        let players = [
            PlayerState::new(Vec::new(), config.starting_energy),
            PlayerState::new(Vec::new(), config.starting_energy),
        ];
        GameState {
            game_id,
            turn: 1,
            half_turn: 1,
            active_player: PlayerId::FIRST,
            phase: Phase::Start,
            winner: None,
            end_reason: None,
            players,
            logger: GameLogger::with_verbosity(config.verbosity),
            config,
            pending_attack: None,
            pending_technique: None,
            pending_pierce: None,
            end_of_turn_applied: false,
            rng: ChaCha12Rng::seed_from_u64(0),
            catalog,
            effects,
        }
    }

    /// Set the RNG seed for deterministic shuffles
    pub fn seed_rng(&mut self, seed: u64) {
        self.rng = ChaCha12Rng::seed_from_u64(seed);
    }

    /// Shuffle a player's deck using the game's RNG
    pub fn shuffle_deck(&mut self, player: PlayerId) {
        use rand::seq::SliceRandom;
        let deck = &mut self.players[player.index()].deck;
        deck.make_contiguous().shuffle(&mut self.rng);
    }

    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    pub fn effects(&self) -> &EffectRegistry {
        &self.effects
    }

    pub fn player(&self, player: PlayerId) -> &PlayerState {
        &self.players[player.index()]
    }

    pub fn player_mut(&mut self, player: PlayerId) -> &mut PlayerState {
        &mut self.players[player.index()]
    }

    pub fn card(&self, id: &CardId) -> Option<&CardDefinition> {
        self.catalog.get(id)
    }

    /// Display name of a card, falling back to its id
    pub fn card_name(&self, id: &CardId) -> String {
        self.card(id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// The slot and definition of the unit at `player`/`slot`, if any
    pub fn unit_at(&self, player: PlayerId, slot: usize) -> Option<(&BattlefieldSlot, &CardDefinition)> {
        let slot = self.player(player).slot(slot)?;
        let card = self.card(slot.occupant.as_ref()?)?;
        Some((slot, card))
    }

    pub fn unit_name(&self, player: PlayerId, slot: usize) -> String {
        self.unit_at(player, slot)
            .map(|(_, card)| card.name.clone())
            .unwrap_or_else(|| "an empty slot".to_string())
    }

    pub fn is_ai(&self, player: PlayerId) -> bool {
        self.config.controller(player) == ControllerKind::Heuristic
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// The outcome every mutating operation returns once the game is decided
    pub fn game_over_outcome(&self) -> Option<ActionOutcome> {
        self.winner.map(|winner| ActionOutcome::GameOver { winner })
    }

    /// Effect of the field `player` controls
    pub fn field_effect(&self, player: PlayerId) -> Option<FieldEffect> {
        let field = self.player(player).field.as_ref()?;
        self.effects.field(field).cloned()
    }

    /// Smallest board-size limit imposed by either field
    pub fn board_limit(&self) -> Option<usize> {
        PlayerId::both()
            .into_iter()
            .filter_map(|p| match self.field_effect(p) {
                Some(FieldEffect::BoardLimit(limit)) => Some(limit),
                _ => None,
            })
            .min()
    }

    /// Append a rules event to the game log
    pub fn log(&mut self, message: impl AsRef<str>) {
        self.logger.normal(self.turn, self.phase, message.as_ref());
    }

    /// Diagnostic line; never enters the game log
    pub fn debug(&self, message: impl AsRef<str>) {
        self.logger.verbose(message.as_ref());
    }

    /// Record the winner. Only the first call has any effect.
    pub fn declare_winner(&mut self, winner: PlayerId, reason: GameEndReason) {
        if self.winner.is_some() {
            return;
        }
        self.winner = Some(winner);
        self.end_reason = Some(reason);
        let message = format!("{winner} wins the game!");
        self.logger.minimal(self.turn, self.phase, &message);
    }

    /// Draw `count` cards for `player`
    ///
    /// Running out on a required draw loses the game immediately. Returns
    /// `false` when that happened.
    pub fn draw_cards(&mut self, player: PlayerId, count: usize) -> bool {
        for _ in 0..count {
            if self.player_mut(player).draw().is_none() {
                self.log(format!("{player} ran out of cards!"));
                self.declare_winner(player.opponent(), GameEndReason::Decking(player));
                return false;
            }
        }
        true
    }
}
