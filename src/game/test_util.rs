//! Fixtures shared by the rules unit tests

use crate::core::{CardDefinition, CardId, Keyword, PlayerId};
use crate::game::{EffectRegistry, GameConfig, GameState, Phase};
use crate::core::GameId;
use crate::loader::CardCatalog;
use std::sync::Arc;

/// Built-in catalog plus small units with round numbers
pub(crate) fn test_catalog() -> CardCatalog {
    let mut catalog = CardCatalog::builtin().expect("builtin catalog");
    let cards = [
        CardDefinition::unit("t_brute", "Brute", 2, 3, 3, 2),
        CardDefinition::unit("t_wall", "Wall", 2, 1, 3, 1),
        CardDefinition::unit("t_glass", "Glass", 1, 1, 1, 3),
        CardDefinition::unit("t_swift_slow", "Slow Sprinter", 1, 1, 2, 1).with_keyword(Keyword::Swift),
        CardDefinition::unit("t_fast", "Fast", 2, 2, 2, 5),
        CardDefinition::unit("t_guard", "Guard", 2, 1, 4, 1).with_keyword(Keyword::Guard),
        CardDefinition::unit("t_blight", "Blight", 2, 1, 2, 3)
            .with_keyword(Keyword::Wither)
            .with_keyword(Keyword::Corrupt),
        CardDefinition::unit("t_lance", "Lance", 4, 5, 3, 3).with_keyword(Keyword::Pierce),
        CardDefinition::unit("t_skyforge", "Sky Unit", 3, 2, 2, 2).with_faction("Skyforge"),
    ];
    for card in cards {
        catalog.add_card(card);
    }
    catalog
}

/// Two-human game with 20-card decks of Brutes, still in the start phase
pub(crate) fn test_game(config: GameConfig) -> GameState {
    let mut game = GameState::new(
        GameId::new("test"),
        Arc::new(test_catalog()),
        Arc::new(EffectRegistry::standard()),
        config,
    );
    for player in PlayerId::both() {
        game.player_mut(player).deck = (0..20).map(|_| CardId::new("t_brute")).collect();
    }
    game
}

/// Turn 2, player 1 active, deploy phase
pub(crate) fn deploy_game() -> GameState {
    let mut game = test_game(GameConfig::human_vs_human());
    game.turn = 2;
    game.half_turn = 3;
    game.phase = Phase::Deploy;
    game
}

/// Turn 2, player 1 active, combat phase
pub(crate) fn combat_game() -> GameState {
    let mut game = deploy_game();
    game.phase = Phase::Combat;
    game
}

/// Put a ready unit straight onto the battlefield, deployed last turn
pub(crate) fn place(game: &mut GameState, player: PlayerId, slot: usize, id: &str) {
    let turn = game.turn.saturating_sub(1);
    game.player_mut(player).battlefield[slot].deploy(CardId::new(id), turn, false);
}

pub(crate) fn give(game: &mut GameState, player: PlayerId, id: &str) {
    game.player_mut(player).hand.push(CardId::new(id));
}
