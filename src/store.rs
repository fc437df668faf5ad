//! In-memory game registry and the request-level operation surface
//!
//! [`GameStore`] owns every live game behind its own mutex, so concurrent
//! requests for different games never contend and requests for the same game
//! run one at a time. [`GameService`] wraps each rules operation: look up the
//! game, lock it, run the operation, and return the outcome together with the
//! caller's filtered view.

use crate::core::{CardDefinition, CardId, GameId, PlayerId};
use crate::game::{ActionOutcome, ControllerKind, GameConfig, GameState, GameView};
use crate::loader::{CardCatalog, DeckLoader, GameInitializer};
use crate::{Result, SanctumError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

type SharedGame = Arc<Mutex<GameState>>;

fn lock_game(game: &SharedGame) -> MutexGuard<'_, GameState> {
    game.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Registry of live games keyed by id
pub struct GameStore {
    games: RwLock<FxHashMap<GameId, SharedGame>>,
    initializer: GameInitializer,
    /// Source of game ids and per-game shuffle seeds
    id_rng: Mutex<ChaCha12Rng>,
}

impl GameStore {
    pub fn new(initializer: GameInitializer, seed: u64) -> Self {
        GameStore {
            games: RwLock::new(FxHashMap::default()),
            initializer,
            id_rng: Mutex::new(ChaCha12Rng::seed_from_u64(seed)),
        }
    }

    /// Store over the bundled catalog and standard effects
    pub fn standard(seed: u64) -> Result<Self> {
        Ok(Self::new(GameInitializer::standard()?, seed))
    }

    pub fn catalog(&self) -> &CardCatalog {
        self.initializer.catalog()
    }

    /// Create a game from two starter factions and register it
    pub fn create(&self, factions: [&str; 2], config: GameConfig) -> Result<GameId> {
        let first = DeckLoader::starter_deck(factions[0])?;
        let second = DeckLoader::starter_deck(factions[1])?;
        let (game_id, seed) = {
            let mut rng = self.id_rng.lock().unwrap_or_else(PoisonError::into_inner);
            (GameId::new(format!("{:016x}", rng.gen::<u64>())), rng.gen::<u64>())
        };
        let game = self
            .initializer
            .init_game(game_id.clone(), [&first, &second], config, seed)?;
        self.insert(game);
        Ok(game_id)
    }

    /// Register an already-built game, replacing any game with the same id
    pub fn insert(&self, game: GameState) -> GameId {
        let id = game.game_id.clone();
        self.write().insert(id.clone(), Arc::new(Mutex::new(game)));
        id
    }

    pub fn get(&self, id: &GameId) -> Option<SharedGame> {
        self.read().get(id).cloned()
    }

    pub fn remove(&self, id: &GameId) -> Option<SharedGame> {
        self.write().remove(id)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `f` with exclusive access to one game
    ///
    /// The registry lock is released before the game lock is taken.
    pub fn with_game<R>(&self, id: &GameId, f: impl FnOnce(&mut GameState) -> R) -> Result<R> {
        let game = self
            .get(id)
            .ok_or_else(|| SanctumError::GameNotFound(id.to_string()))?;
        let mut guard = lock_game(&game);
        Ok(f(&mut guard))
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, FxHashMap<GameId, SharedGame>> {
        self.games.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, FxHashMap<GameId, SharedGame>> {
        self.games.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Outcome of one request plus the requester's view of the game afterwards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionResponse {
    pub outcome: ActionOutcome,
    /// Absent when the game does not exist
    pub state: Option<GameView>,
}

/// The operations a request layer exposes, one method per request
pub struct GameService {
    store: GameStore,
}

impl GameService {
    pub fn new(store: GameStore) -> Self {
        GameService { store }
    }

    pub fn store(&self) -> &GameStore {
        &self.store
    }

    /// Every card definition in catalog order
    pub fn list_catalog(&self) -> Vec<CardDefinition> {
        self.store.catalog().iter().cloned().collect()
    }

    /// Start a game; the first faction's seat is the one the view is for
    pub fn create_game(&self, factions: [&str; 2], config: GameConfig) -> Result<(GameId, GameView)> {
        let id = self.store.create(factions, config)?;
        let view = self.get_state(&id, PlayerId::FIRST)?;
        Ok((id, view))
    }

    pub fn get_state(&self, id: &GameId, perspective: PlayerId) -> Result<GameView> {
        self.store.with_game(id, |game| game.view(perspective))
    }

    pub fn play_card(&self, id: &GameId, player: PlayerId, card_id: &CardId) -> ActionResponse {
        self.run(id, player, |game| game.play_card(player, card_id))
    }

    pub fn apply_targeted_technique(
        &self,
        id: &GameId,
        player: PlayerId,
        card_id: &CardId,
        target_player: PlayerId,
        target_slot: usize,
    ) -> ActionResponse {
        self.run(id, player, |game| {
            game.apply_targeted_technique(player, card_id, target_player, target_slot)
        })
    }

    pub fn attack(&self, id: &GameId, player: PlayerId, attacker_slot: usize, defender_slot: usize) -> ActionResponse {
        self.run(id, player, |game| game.attack(player, attacker_slot, defender_slot))
    }

    pub fn resolve_trap(&self, id: &GameId, player: PlayerId, trap_slot: usize, activate: bool) -> ActionResponse {
        self.run(id, player, |game| game.resolve_trap(player, trap_slot, activate))
    }

    /// Pierce overflow is assigned by the attacker, against `defending_player`
    pub fn apply_pierce(&self, id: &GameId, defending_player: PlayerId, target_slot: usize, damage: i32) -> ActionResponse {
        self.run(id, defending_player.opponent(), |game| {
            game.apply_pierce(defending_player, target_slot, damage)
        })
    }

    /// Discard for the active player's hand limit
    pub fn discard_for_hand_limit(&self, id: &GameId, card_index: usize) -> ActionResponse {
        self.run_as_active(id, |game, player| game.discard_for_hand_limit(player, card_index))
    }

    pub fn resolve_board_overage(&self, id: &GameId, player: PlayerId, unit_slot: usize) -> ActionResponse {
        self.run(id, player, |game| game.resolve_board_overage(player, unit_slot))
    }

    /// Advance the phase; the view returned is the first human seat's
    pub fn advance(&self, id: &GameId) -> ActionResponse {
        self.respond(id, |game| {
            let outcome = game.advance();
            let perspective = PlayerId::both()
                .into_iter()
                .find(|&p| game.config.controller(p) == ControllerKind::Human)
                .unwrap_or(PlayerId::FIRST);
            (outcome, perspective)
        })
    }

    fn run(&self, id: &GameId, perspective: PlayerId, op: impl FnOnce(&mut GameState) -> ActionOutcome) -> ActionResponse {
        self.respond(id, |game| (op(game), perspective))
    }

    fn run_as_active(&self, id: &GameId, op: impl FnOnce(&mut GameState, PlayerId) -> ActionOutcome) -> ActionResponse {
        self.respond(id, |game| {
            let player = game.active_player;
            (op(game, player), player)
        })
    }

    fn respond(&self, id: &GameId, op: impl FnOnce(&mut GameState) -> (ActionOutcome, PlayerId)) -> ActionResponse {
        let result = self.store.with_game(id, |game| {
            let (outcome, perspective) = op(game);
            ActionResponse {
                outcome,
                state: Some(game.view(perspective)),
            }
        });
        result.unwrap_or_else(|err| ActionResponse {
            outcome: ActionOutcome::not_found(err.to_string()),
            state: None,
        })
    }
}
