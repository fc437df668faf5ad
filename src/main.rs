//! Seventh Sanctum - Main Binary
//!
//! Text-based rules engine for the two-player Seventh Sanctum card game

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use sanctum_forge::{
    core::{GameId, PlayerId},
    game::{
        ActionOutcome, EffectRegistry, GameConfig, GameState, GameView, UnitView, VerbosityLevel,
    },
    loader::{load_deck_pair, CardCatalog, DeckList, DeckLoader, GameInitializer},
    simulation::{run_simulation, SimulationConfig},
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// Verbosity level for game output (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        arg.0
    }
}

#[derive(Parser)]
#[command(name = "sanctum")]
#[command(about = "Seventh Sanctum - two-player card game engine", long_about = None)]
struct Cli {
    /// Card catalog JSON (defaults to the bundled catalog)
    #[arg(long, global = true, value_name = "CARDS_JSON")]
    cards: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every card in the catalog
    Catalog {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Play against the heuristic AI on stdin
    Play {
        /// Your starter faction
        #[arg(long, default_value = "Skyforge")]
        faction: String,

        /// The AI's starter faction
        #[arg(long, default_value = "Miasma")]
        opponent: String,

        /// Deck file for your seat (overrides --faction)
        #[arg(long, value_name = "DECK", requires = "opponent_deck")]
        deck: Option<PathBuf>,

        /// Deck file for the AI seat (overrides --opponent)
        #[arg(long, value_name = "DECK", requires = "deck")]
        opponent_deck: Option<PathBuf>,

        /// Seed for deck shuffling
        #[arg(long)]
        seed: Option<u64>,

        /// Verbosity level (silent/0, minimal/1, normal/2, verbose/3)
        #[arg(long, short = 'v', default_value = "normal")]
        verbosity: VerbosityArg,
    },

    /// Run AI-vs-AI games in parallel and report win rates
    Simulate {
        /// Number of games to play
        #[arg(long, short = 'n', default_value = "100")]
        games: usize,

        /// Base seed; each game derives its own
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Faction for the first seat
        #[arg(long, default_value = "Skyforge")]
        first: String,

        /// Faction for the second seat
        #[arg(long, default_value = "Miasma")]
        second: String,

        /// Turn limit per game
        #[arg(long, default_value = "200")]
        max_turns: u32,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let initializer = load_initializer(cli.cards).await?;

    match cli.command {
        Commands::Catalog { json } => print_catalog(initializer.catalog(), json)?,
        Commands::Play {
            faction,
            opponent,
            deck,
            opponent_deck,
            seed,
            verbosity,
        } => {
            let decks = match (deck, opponent_deck) {
                (Some(mine), Some(theirs)) => {
                    let (decks, elapsed) = load_deck_pair(mine, theirs).await?;
                    println!("Loaded decks in {:.1}ms", elapsed.as_secs_f64() * 1000.0);
                    decks
                }
                _ => [
                    DeckLoader::starter_deck(&faction)?,
                    DeckLoader::starter_deck(&opponent)?,
                ],
            };
            run_play(&initializer, decks, seed, verbosity.into())?
        }
        Commands::Simulate {
            games,
            seed,
            first,
            second,
            max_turns,
            json,
        } => {
            let config = SimulationConfig {
                games,
                seed,
                factions: [first, second],
                max_turns,
            };
            let (summary, _) =
                tokio::task::spawn_blocking(move || run_simulation(&initializer, &config)).await??;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("=== Simulation Complete ===");
                println!("Games: {}", summary.games);
                for player in PlayerId::both() {
                    println!(
                        "{player} wins: {} ({:.1}%)",
                        summary.wins[player.index()],
                        summary.win_rate(player) * 100.0
                    );
                }
                println!("Unfinished (turn limit): {}", summary.unfinished);
                println!("Decided by decking: {}", summary.by_decking);
                println!("Decided by control loss: {}", summary.by_control_loss);
                println!("Average turns: {:.1}", summary.average_turns);
                println!(
                    "Elapsed: {:.1}ms ({:.1} games/sec)",
                    summary.elapsed_ms,
                    summary.games as f64 / (summary.elapsed_ms / 1000.0).max(f64::EPSILON)
                );
            }
        }
    }

    Ok(())
}

async fn load_initializer(cards: Option<PathBuf>) -> anyhow::Result<GameInitializer> {
    let Some(path) = cards else {
        return Ok(GameInitializer::standard()?);
    };
    let (catalog, elapsed) = CardCatalog::load_from_file_async(&path)
        .await
        .with_context(|| format!("loading card catalog {}", path.display()))?;
    eprintln!(
        "Loaded {} cards in {:.1}ms",
        catalog.len(),
        elapsed.as_secs_f64() * 1000.0
    );
    Ok(GameInitializer::new(
        Arc::new(catalog),
        Arc::new(EffectRegistry::standard()),
    ))
}

fn print_catalog(catalog: &CardCatalog, json: bool) -> anyhow::Result<()> {
    let mut cards: Vec<_> = catalog.iter().collect();
    cards.sort_by(|a, b| (a.faction.as_str(), &a.id).cmp(&(b.faction.as_str(), &b.id)));

    if json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
        return Ok(());
    }
    for card in cards {
        let stats = match (card.atk, card.def, card.spd) {
            (Some(atk), Some(def), Some(spd)) => format!("{atk}/{def}/{spd}"),
            _ => String::new(),
        };
        println!(
            "{:<28} {:<26} {:<10} {:<9} cost {:>2}  {:<8} {}",
            card.id.as_str(),
            card.name,
            card.faction.as_str(),
            card.card_type.to_string(),
            card.cost,
            stats,
            card.text
        );
    }
    Ok(())
}

/// One parsed line of player input
enum Input {
    Action(ActionOutcome),
    Show,
    Json,
    Help,
    Quit,
}

fn run_play(
    initializer: &GameInitializer,
    decks: [DeckList; 2],
    seed: Option<u64>,
    verbosity: VerbosityLevel,
) -> anyhow::Result<()> {
    let seed = seed.unwrap_or_else(rand::random);
    let config = GameConfig::default().with_verbosity(verbosity);
    let mut game = initializer.init_game(
        GameId::new(format!("local-{seed:x}")),
        [&decks[0], &decks[1]],
        config,
        seed,
    )?;
    let me = PlayerId::FIRST;

    println!("{} vs {} (seed {seed})", decks[0].name, decks[1].name);
    print_help();
    print_view(&game.view(me));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while game.winner.is_none() {
        print!("{} {}> ", game.active_player, game.phase);
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        match execute(&mut game, me, line?.trim()) {
            Ok(Input::Action(outcome)) => {
                println!("{}", describe(&outcome));
                print_view(&game.view(me));
            }
            Ok(Input::Show) => print_view(&game.view(me)),
            Ok(Input::Json) => println!("{}", serde_json::to_string_pretty(&game.view(me))?),
            Ok(Input::Help) => print_help(),
            Ok(Input::Quit) => return Ok(()),
            Err(e) => println!("{e}"),
        }
    }

    if let Some(winner) = game.winner {
        let verdict = if winner == me { "You win!" } else { "You lose." };
        println!("Game over on turn {}: {verdict}", game.turn);
    }
    Ok(())
}

fn execute(game: &mut GameState, me: PlayerId, line: &str) -> anyhow::Result<Input> {
    let mut words = line.split_whitespace();
    let command = words.next().unwrap_or("advance").to_lowercase();
    let args: Vec<&str> = words.collect();
    let number = |i: usize| -> anyhow::Result<usize> {
        let raw = args
            .get(i)
            .with_context(|| format!("'{command}' needs argument {}", i + 1))?;
        raw.parse()
            .with_context(|| format!("'{raw}' is not a number"))
    };

    let outcome = match command.as_str() {
        "advance" | "a" | "next" => game.advance(),
        "play" | "p" => {
            let index = number(0)?;
            let card = game
                .player(me)
                .hand
                .get(index)
                .cloned()
                .with_context(|| format!("no card at hand index {index}"))?;
            game.play_card(me, &card)
        }
        "target" | "t" => {
            let side = match args.first().map(|s| s.to_lowercase()).as_deref() {
                Some("me" | "own" | "mine") => me,
                Some("opp" | "enemy" | "them") => me.opponent(),
                _ => bail!("usage: target me|opp <slot>"),
            };
            let slot = number(1)?;
            let pending = game
                .pending_technique
                .clone()
                .context("no technique is waiting for a target")?;
            game.apply_targeted_technique(me, &pending.card_id, side, slot)
        }
        "attack" | "x" => game.attack(me, number(0)?, number(1)?),
        "trap" => {
            let slot = number(0)?;
            let activate = match args.get(1).map(|s| s.to_lowercase()).as_deref() {
                Some("yes" | "y") => true,
                Some("no" | "n") => false,
                _ => bail!("usage: trap <slot> yes|no"),
            };
            game.resolve_trap(me, slot, activate)
        }
        "pierce" => {
            let slot = number(0)?;
            let damage = if args.len() > 1 { number(1)? as i32 } else { 1 };
            game.apply_pierce(me.opponent(), slot, damage)
        }
        "discard" => game.discard_for_hand_limit(me, number(0)?),
        "destroy" => game.resolve_board_overage(me, number(0)?),
        "state" | "s" => return Ok(Input::Show),
        "json" => return Ok(Input::Json),
        "help" | "?" => return Ok(Input::Help),
        "quit" | "q" | "exit" => return Ok(Input::Quit),
        other => bail!("unknown command '{other}' (type 'help')"),
    };
    Ok(Input::Action(outcome))
}

fn describe(outcome: &ActionOutcome) -> String {
    match outcome {
        ActionOutcome::Success { message, combat } => match combat {
            Some(report) if !report.log.is_empty() => {
                format!("{message}\n  {}", report.log.join("\n  "))
            }
            _ => message.clone(),
        },
        ActionOutcome::Error { category, reason } => format!("Refused ({category:?}): {reason}"),
        ActionOutcome::NeedsTarget { card_id, target } => {
            format!("{card_id} needs a target ({target:?}): use 'target me|opp <slot>'")
        }
        ActionOutcome::TrapInterrupt(prompt) => format!(
            "{} Activate {} for {} energy? Use 'trap {} yes|no'",
            prompt.trigger_message, prompt.trap_name, prompt.cost, prompt.trap_slot
        ),
        ActionOutcome::GameOver { winner } => format!("Game over: {winner} wins"),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  advance | a | <enter>    move to the next phase");
    println!("  play <hand#>             play a card from your hand");
    println!("  target me|opp <slot>     choose the target of a technique");
    println!("  attack <slot> <slot>     attack an enemy unit");
    println!("  trap <slot> yes|no       answer a trap prompt");
    println!("  pierce <slot> [damage]   assign Pierce overflow");
    println!("  discard <hand#>          discard down to the hand limit");
    println!("  destroy <slot>           destroy a unit over the board limit");
    println!("  state | json | help | quit");
}

fn unit_line(unit: &UnitView) -> String {
    let mut flags = Vec::new();
    if unit.exhausted {
        flags.push("exhausted".to_string());
    }
    if unit.wither_stacks > 0 {
        flags.push(format!("wither x{}", unit.wither_stacks));
    }
    if unit.corrupt {
        flags.push("corrupt".to_string());
    }
    if unit.petrified {
        flags.push("petrified".to_string());
    }
    if unit.no_retaliate {
        flags.push("bound".to_string());
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" ({})", flags.join(", "))
    };
    format!(
        "[{}] {} {}/{}/{}{flags}",
        unit.slot, unit.card.name, unit.atk, unit.def, unit.spd
    )
}

fn print_board(label: &str, battlefield: &[Option<UnitView>]) {
    let units: Vec<String> = battlefield.iter().flatten().map(unit_line).collect();
    if units.is_empty() {
        println!("  {label}: (empty)");
    } else {
        println!("  {label}: {}", units.join("  "));
    }
}

fn print_view(view: &GameView) {
    println!(
        "--- Turn {} | {} | {} to act ---",
        view.turn, view.phase, view.active_player
    );
    let opp = &view.opponent;
    println!(
        "  Opponent: energy {}, hand {}, deck {}, traps {}, field {}",
        opp.energy,
        opp.hand_count,
        opp.deck_count,
        opp.trap_count,
        opp.field.as_ref().map_or("-", |f| f.name.as_str())
    );
    print_board("Enemy units", &opp.battlefield);
    print_board("Your units ", &view.you.battlefield);
    let you = &view.you;
    println!(
        "  You: energy {}, deck {}, field {}, control loss {}",
        you.energy,
        you.deck_count,
        you.field.as_ref().map_or("-", |f| f.name.as_str()),
        you.control_loss
    );
    let traps: Vec<String> = you
        .traps
        .iter()
        .enumerate()
        .filter_map(|(i, t)| t.as_ref().map(|t| format!("[{i}] {}", t.name)))
        .collect();
    if !traps.is_empty() {
        println!("  Traps: {}", traps.join("  "));
    }
    for (i, card) in you.hand.iter().enumerate() {
        println!("  {i}: {} ({}, cost {})", card.name, card.card_type, card.cost);
    }
    if let Some(prompt) = &view.trap_prompt {
        println!(
            "  ! {} Answer with 'trap {} yes|no'",
            prompt.trigger_message, prompt.trap_slot
        );
    }
    if let Some(pending) = &view.pending_technique {
        println!("  ! {} needs a target ({:?})", pending.card_id, pending.target);
    }
    if let Some(pierce) = &view.pending_pierce {
        println!("  ! {} Pierce damage can be assigned", pierce.damage);
    }
    if you.must_discard > 0 {
        println!("  ! Discard {} card(s)", you.must_discard);
    }
    if you.rotfall_must_destroy > 0 {
        println!("  ! Destroy {} unit(s)", you.rotfall_must_destroy);
    }
}
