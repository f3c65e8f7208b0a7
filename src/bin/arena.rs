//! Arena CLI: run autopilot-vs-autopilot soak games from the command line.
//!
//! Usage:
//!   cargo run --release --bin arena -- --games 200 --entrants greedy,random
//!   cargo run --release --bin arena -- --games 50 --entrants cautious,greedy --config whaleopoly.toml

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use whaleopoly_engine::engine::arena::{run_arena, ArenaSettings, Entrant};
use whaleopoly_engine::engine::bot_profiles::BotProfile;
use whaleopoly_engine::engine::config::{load_config, load_default_config};

#[derive(Parser)]
#[command(name = "arena", about = "Run autopilot arena games for Whaleopoly")]
struct Cli {
    /// Number of games to play
    #[arg(long, default_value = "100")]
    games: usize,

    /// Random seed of the first game
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Turns played per game
    #[arg(long, default_value = "200")]
    turns: usize,

    /// Alternate seat positions between games
    #[arg(long, default_value = "true")]
    alternate_seats: bool,

    /// Path to whaleopoly.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Entrants, comma separated: profile names from the config, or "greedy"/"random"
    #[arg(long, value_delimiter = ',', default_value = "greedy,random")]
    entrants: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .init();

    let cli = Cli::parse();

    let file = match &cli.config {
        Some(path) => load_config(path).map_err(|e| format!("Error loading config: {}", e))?,
        None => load_default_config(),
    };

    let entrants: Vec<Entrant> = cli
        .entrants
        .iter()
        .map(|name| {
            let profile = match file.profiles.get(name) {
                Some(profile) => profile.clone(),
                None => BotProfile {
                    strategy_type: name.clone(),
                    ..BotProfile::default()
                },
            };
            Entrant::new(name.clone(), profile)
        })
        .collect();

    let settings = ArenaSettings {
        num_games: cli.games,
        base_seed: cli.seed,
        turns_per_game: cli.turns,
        alternate_seats: cli.alternate_seats,
    };

    eprintln!(
        "Arena: {} games, {} turns each, seed={}, alternate_seats={}",
        settings.num_games, settings.turns_per_game, settings.base_seed, settings.alternate_seats
    );
    for entrant in &entrants {
        eprintln!("  {}: {}", entrant.name, entrant.profile.label());
    }
    eprintln!();

    let result = run_arena(&entrants, &file.rules, &settings);
    println!("{}", result.summary());
    Ok(())
}
