//! Shared fixtures for integration tests

#![allow(dead_code)]

use sanctum_forge::core::{CardDefinition, CardId, GameId, Keyword, PlayerId};
use sanctum_forge::game::{EffectRegistry, GameConfig, GameState, Phase};
use sanctum_forge::loader::CardCatalog;
use std::sync::Arc;

pub const P0: PlayerId = PlayerId::FIRST;
pub const P1: PlayerId = PlayerId::SECOND;

/// Bundled catalog plus a few units with round numbers
pub fn catalog() -> CardCatalog {
    let mut catalog = CardCatalog::builtin().expect("builtin catalog");
    catalog.add_card(CardDefinition::unit("it_striker", "Striker", 2, 3, 3, 3));
    catalog.add_card(CardDefinition::unit("it_bastion", "Bastion", 2, 1, 3, 3));
    catalog.add_card(
        CardDefinition::unit("it_dart", "Dart", 1, 2, 2, 1).with_keyword(Keyword::Swift),
    );
    catalog.add_card(CardDefinition::unit("it_hare", "Hare", 1, 1, 1, 5));
    catalog
}

/// Game with 20-card decks of Strikers in the start phase of turn 1
pub fn new_game(config: GameConfig) -> GameState {
    let mut game = GameState::new(
        GameId::new("it"),
        Arc::new(catalog()),
        Arc::new(EffectRegistry::standard()),
        config,
    );
    for player in PlayerId::both() {
        game.player_mut(player).deck = (0..20).map(|_| CardId::new("it_striker")).collect();
    }
    game
}

/// Two human seats, turn 2, first player to act in `phase`
pub fn game_in(phase: Phase) -> GameState {
    let mut game = new_game(GameConfig::human_vs_human());
    game.turn = 2;
    game.half_turn = 3;
    game.phase = phase;
    game
}

/// Put a ready unit on the battlefield as if it arrived last turn
pub fn place(game: &mut GameState, player: PlayerId, slot: usize, id: &str) {
    let turn = game.turn.saturating_sub(1);
    game.player_mut(player).battlefield[slot].deploy(CardId::new(id), turn, false);
}

pub fn give(game: &mut GameState, player: PlayerId, id: &str) {
    game.player_mut(player).hand.push(CardId::new(id));
}

pub fn log_text(game: &GameState) -> Vec<String> {
    game.logger.entries().iter().map(|e| e.message.clone()).collect()
}
