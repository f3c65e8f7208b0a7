use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use whaleopoly_engine::engine::authority::RemoteAuthority;
use whaleopoly_engine::engine::bot_profiles::BotProfile;
use whaleopoly_engine::engine::bot_strategy::BotStrategy;
use whaleopoly_engine::engine::config::{load_config, load_default_config, load_script};
use whaleopoly_engine::engine::models::{money, GameConfig, SEAT_COUNT};
use whaleopoly_engine::engine::session::Table;
use whaleopoly_engine::engine::simulator::standings;

#[derive(Parser)]
#[command(name = "whaleopoly", about = "Play or replay a local Whaleopoly table")]
struct Cli {
    /// Seed for dice and deck order
    #[arg(long, default_value = "42", env = "WHALEOPOLY_SEED")]
    seed: u64,

    /// Game id reported to the remote authority
    #[arg(long, default_value = "0")]
    game_id: u64,

    /// Number of turns the autopilot plays
    #[arg(long, default_value = "12")]
    turns: usize,

    /// Path to whaleopoly.toml (default: auto-discover)
    #[arg(long, env = "WHALEOPOLY_CONFIG")]
    config: Option<PathBuf>,

    /// Replay a JSON action script instead of autoplaying
    #[arg(long)]
    script: Option<PathBuf>,

    /// Profile per seat, comma separated (names from [profiles] or "greedy"/"random")
    #[arg(long, value_delimiter = ',', default_value = "greedy")]
    seats: Vec<String>,

    /// Skip the dice presentation delay
    #[arg(long)]
    no_delay: bool,

    /// Print the final state as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    let file = match &cli.config {
        Some(path) => load_config(path).map_err(|e| format!("Failed to load config: {}", e))?,
        None => load_default_config(),
    };
    let mut session = file.session.clone();
    if cli.no_delay {
        session.roll_delay_ms = 0;
    }

    if let Some(path) = &cli.script {
        let script = load_script(path)?;
        tracing::info!(path = %path.display(), actions = script.actions.len(), "replaying script");
        let mut table = Table::offline(script.game_config(), file.rules.clone(), session);
        let results = table.replay(&script.actions).await;
        let rejected = results.iter().filter(|r| r.is_err()).count();
        tracing::info!(applied = results.len() - rejected, rejected, "script finished");
        report(&table, cli.json)?;
        return Ok(());
    }

    let config = GameConfig {
        game_id: cli.game_id,
        random_seed: Some(cli.seed),
    };
    let strategies: Vec<Box<dyn BotStrategy>> = (0..SEAT_COUNT)
        .map(|seat| {
            let name = &cli.seats[seat % cli.seats.len().max(1)];
            let profile = file.profiles.get(name).cloned().unwrap_or_else(|| BotProfile {
                strategy_type: name.clone(),
                ..BotProfile::default()
            });
            tracing::info!(seat, profile = %name, strategy = %profile.label(), "seat assigned");
            profile.to_strategy(cli.seed.wrapping_add(seat as u64))
        })
        .collect();

    let mut table = Table::offline(config, file.rules.clone(), session);
    for _ in 0..cli.turns {
        let seat = table.state().current;
        let turn = table.autoplay_turn(strategies[seat].as_ref()).await;
        tracing::info!(
            seat = turn.seat,
            applied = turn.applied,
            rejected = turn.rejected,
            forced = turn.forced,
            "turn played"
        );
    }
    report(&table, cli.json)?;
    Ok(())
}

fn report<A: RemoteAuthority>(table: &Table<A>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let game = table.game();
    println!("Activity (newest first)");
    for entry in game.activity().iter() {
        println!("  [{:?}] {}: {}", entry.severity, entry.title, entry.body);
    }
    println!();
    for outcome in standings(game) {
        println!(
            "  {}: cash {:>6}  worth {:>6}  tiles {:>2}  ({})",
            outcome.player_id,
            outcome.cash,
            outcome.net_worth,
            outcome.tiles_owned,
            money(outcome.cash - game.rules().starting_cash),
        );
    }
    if json {
        println!("{}", serde_json::to_string_pretty(game.state())?);
    }
    Ok(())
}
