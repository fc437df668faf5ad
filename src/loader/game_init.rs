//! Game initialization from decks
//!
//! Creates games from deck lists and the shared card catalog

use crate::core::{GameId, PlayerId};
use crate::game::{EffectRegistry, GameConfig, GameState};
use crate::loader::{CardCatalog, DeckList};
use crate::Result;
use std::sync::Arc;

/// Game builder for initializing games from decks
pub struct GameInitializer {
    catalog: Arc<CardCatalog>,
    effects: Arc<EffectRegistry>,
}

impl GameInitializer {
    pub fn new(catalog: Arc<CardCatalog>, effects: Arc<EffectRegistry>) -> Self {
        GameInitializer { catalog, effects }
    }

    /// Initializer over the bundled catalog and the standard effect registry
    pub fn standard() -> Result<Self> {
        Ok(Self::new(
            Arc::new(CardCatalog::builtin()?),
            Arc::new(EffectRegistry::standard()),
        ))
    }

    pub fn catalog(&self) -> &Arc<CardCatalog> {
        &self.catalog
    }

    pub fn effects(&self) -> &Arc<EffectRegistry> {
        &self.effects
    }

    /// Initialize a two-player game from two decks
    ///
    /// Both decks are shuffled with an RNG seeded from `seed` and each player
    /// draws the opening hand. Play begins in the start phase of turn 1.
    pub fn init_game(
        &self,
        game_id: GameId,
        decks: [&DeckList; 2],
        config: GameConfig,
        seed: u64,
    ) -> Result<GameState> {
        let mut game = GameState::new(game_id, Arc::clone(&self.catalog), Arc::clone(&self.effects), config);
        game.seed_rng(seed);

        for (player, deck) in PlayerId::both().into_iter().zip(decks) {
            game.player_mut(player).deck = deck.expand(&self.catalog)?.into();
            game.shuffle_deck(player);
        }

        let hand = game.config.starting_hand;
        for player in PlayerId::both() {
            game.draw_cards(player, hand);
        }
        game.log("Game started!");
        Ok(game)
    }
}
