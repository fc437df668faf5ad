//! Performance benchmarks for the Seventh Sanctum engine
//!
//! Measures full AI-vs-AI games with Criterion.rs. Two modes:
//!
//! 1. **Fresh** - shuffle and deal a new game each iteration
//! 2. **Clone** - deal once, then clone the dealt state each iteration
//!
//! Both seats use the heuristic AI with the bundled Skyforge and Miasma decks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sanctum_forge::{
    core::GameId,
    game::{GameConfig, GameLoop, GameState},
    loader::{DeckList, DeckLoader, GameInitializer},
    Result,
};
use std::time::{Duration, Instant};

/// Metrics collected during game execution
#[derive(Debug, Clone)]
struct GameMetrics {
    turns: u32,
    /// Game log entries written
    actions: usize,
    duration: Duration,
}

impl GameMetrics {
    fn games_per_sec(&self) -> f64 {
        1.0 / self.duration.as_secs_f64()
    }

    fn actions_per_turn(&self) -> f64 {
        if self.turns == 0 {
            0.0
        } else {
            self.actions as f64 / self.turns as f64
        }
    }
}

struct BenchmarkSetup {
    init: GameInitializer,
    decks: [DeckList; 2],
}

impl BenchmarkSetup {
    fn load() -> Result<Self> {
        Ok(BenchmarkSetup {
            init: GameInitializer::standard()?,
            decks: [
                DeckLoader::starter_deck("Skyforge")?,
                DeckLoader::starter_deck("Miasma")?,
            ],
        })
    }

    fn deal(&self, seed: u64) -> Result<GameState> {
        self.init.init_game(
            GameId::new("bench"),
            [&self.decks[0], &self.decks[1]],
            GameConfig::ai_vs_ai(),
            seed,
        )
    }
}

fn play_out(mut game: GameState) -> GameMetrics {
    let start = Instant::now();
    let result = GameLoop::new(&mut game).run_game();
    GameMetrics {
        turns: result.turns_played,
        actions: game.logger.entries().len(),
        duration: start.elapsed(),
    }
}

fn bench_game_fresh(c: &mut Criterion) {
    let setup = match BenchmarkSetup::load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Skipping benchmark - failed to load resources: {}", e);
            return;
        }
    };

    let mut group = c.benchmark_group("game_execution");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    let seed = 42u64;
    if let Ok(game) = setup.deal(seed) {
        let metrics = play_out(game);
        println!("\nWarmup game (seed {}):", seed);
        println!("  Turns: {}", metrics.turns);
        println!("  Actions: {}", metrics.actions);
        println!("  Duration: {:?}", metrics.duration);
        println!("  Games/sec: {:.2}", metrics.games_per_sec());
        println!("  Actions/turn: {:.2}", metrics.actions_per_turn());
    }

    group.bench_with_input(BenchmarkId::new("fresh", seed), &seed, |b, &seed| {
        b.iter(|| {
            let game = setup.deal(black_box(seed)).expect("Deck should deal");
            play_out(game)
        });
    });

    group.finish();
}

fn bench_game_clone(c: &mut Criterion) {
    let setup = match BenchmarkSetup::load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Skipping benchmark - failed to load resources: {}", e);
            return;
        }
    };
    let seed = 42u64;
    let dealt = match setup.deal(seed) {
        Ok(game) => game,
        Err(e) => {
            eprintln!("Skipping benchmark - failed to deal: {}", e);
            return;
        }
    };

    let mut group = c.benchmark_group("game_execution");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));
    group.bench_with_input(BenchmarkId::new("clone", seed), &dealt, |b, dealt| {
        b.iter(|| play_out(black_box(dealt.clone())));
    });
    group.finish();
}

criterion_group!(benches, bench_game_fresh, bench_game_clone);
criterion_main!(benches);
