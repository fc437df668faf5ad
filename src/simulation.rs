//! Parallel AI-vs-AI simulation
//!
//! Plays many independent games across threads with rayon and summarizes
//! the results. Each game's shuffle seed is derived from the run seed and
//! the game index, so a run is reproducible regardless of scheduling.

use crate::core::{GameId, PlayerId};
use crate::game::{GameConfig, GameEndReason, GameLoop, GameResult};
use crate::loader::{DeckLoader, GameInitializer};
use crate::Result;
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;

/// Parameters of one simulation run
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub games: usize,
    pub seed: u64,
    /// Starter faction for each seat
    pub factions: [String; 2],
    pub max_turns: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            games: 100,
            seed: 42,
            factions: ["Skyforge".to_string(), "Miasma".to_string()],
            max_turns: 200,
        }
    }
}

/// Outcome of one simulated game
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub index: usize,
    pub seed: u64,
    pub result: GameResult,
}

/// Aggregate statistics over a run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub games: usize,
    /// Wins per seat
    pub wins: [usize; 2],
    pub unfinished: usize,
    pub by_decking: usize,
    pub by_control_loss: usize,
    pub average_turns: f64,
    pub elapsed_ms: f64,
}

impl SimulationSummary {
    fn from_records(records: &[MatchRecord]) -> Self {
        let mut summary = SimulationSummary {
            games: records.len(),
            ..Self::default()
        };
        let mut turns = 0u64;
        for record in records {
            turns += u64::from(record.result.turns_played);
            match record.result.winner {
                Some(winner) => summary.wins[winner.index()] += 1,
                None => summary.unfinished += 1,
            }
            match record.result.end_reason {
                GameEndReason::Decking(_) => summary.by_decking += 1,
                GameEndReason::ControlLoss(_) => summary.by_control_loss += 1,
                GameEndReason::TurnLimit | GameEndReason::Manual => {}
            }
        }
        if !records.is_empty() {
            summary.average_turns = turns as f64 / records.len() as f64;
        }
        summary
    }

    /// Share of finished and unfinished games won by `player`
    pub fn win_rate(&self, player: PlayerId) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.wins[player.index()] as f64 / self.games as f64
    }
}

/// Seed for game `index` of a run seeded with `seed`
pub fn game_seed(seed: u64, index: usize) -> u64 {
    seed.wrapping_add((index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Play `config.games` AI-vs-AI games in parallel
pub fn run_simulation(init: &GameInitializer, config: &SimulationConfig) -> Result<(SimulationSummary, Vec<MatchRecord>)> {
    let first = DeckLoader::starter_deck(&config.factions[0])?;
    let second = DeckLoader::starter_deck(&config.factions[1])?;
    let start = Instant::now();

    let records = (0..config.games)
        .into_par_iter()
        .map(|index| {
            let seed = game_seed(config.seed, index);
            let mut game = init.init_game(
                GameId::new(format!("sim-{index}")),
                [&first, &second],
                GameConfig::ai_vs_ai(),
                seed,
            )?;
            let result = GameLoop::new(&mut game).with_max_turns(config.max_turns).run_game();
            Ok(MatchRecord { index, seed, result })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut summary = SimulationSummary::from_records(&records);
    summary.elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    Ok((summary, records))
}
