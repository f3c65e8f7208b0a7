//! Autopilot arena: plays many seeded games in parallel and aggregates how
//! each entrant fared.

use std::collections::BTreeMap;
use std::time::Instant;

use rayon::prelude::*;

use crate::engine::bot_profiles::BotProfile;
use crate::engine::bot_strategy::BotStrategy;
use crate::engine::config::RulesConfig;
use crate::engine::models::{GameConfig, SEAT_COUNT};
use crate::engine::simulator::{play_game, GameSummary};
use crate::game::Game;

/// A named profile taking part in the arena.
#[derive(Debug, Clone)]
pub struct Entrant {
    pub name: String,
    pub profile: BotProfile,
}

impl Entrant {
    pub fn new(name: impl Into<String>, profile: BotProfile) -> Self {
        Self {
            name: name.into(),
            profile,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArenaSettings {
    pub num_games: usize,
    pub base_seed: u64,
    pub turns_per_game: usize,
    /// Rotate entrants across seats from one game to the next.
    pub alternate_seats: bool,
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            num_games: 100,
            base_seed: 42,
            turns_per_game: 200,
            alternate_seats: true,
        }
    }
}

/// Aggregated results from an arena run, keyed by entrant name.
#[derive(Debug, Clone, Default)]
pub struct ArenaResult {
    pub num_games: usize,
    pub wins: BTreeMap<String, usize>,
    pub draws: usize,
    pub insolvencies: BTreeMap<String, usize>,
    pub final_cash: BTreeMap<String, Vec<i64>>,
    pub net_worth: BTreeMap<String, Vec<i64>>,
    pub forced_turns: usize,
    pub game_durations_ms: Vec<f64>,
}

fn mean(values: Option<&Vec<i64>>) -> f64 {
    match values {
        Some(v) if !v.is_empty() => v.iter().sum::<i64>() as f64 / v.len() as f64,
        _ => 0.0,
    }
}

impl ArenaResult {
    pub fn win_rate(&self, name: &str) -> f64 {
        *self.wins.get(name).unwrap_or(&0) as f64 / self.num_games.max(1) as f64
    }

    pub fn avg_cash(&self, name: &str) -> f64 {
        mean(self.final_cash.get(name))
    }

    pub fn avg_net_worth(&self, name: &str) -> f64 {
        mean(self.net_worth.get(name))
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![format!("Arena Results ({} games)", self.num_games)];
        lines.push("=".repeat(72));
        for (name, wins) in &self.wins {
            lines.push(format!(
                "  {:>12}: {:3} wins ({:5.1}%)  cash={:7.0}  worth={:7.0}  insolvent={}",
                name,
                wins,
                self.win_rate(name) * 100.0,
                self.avg_cash(name),
                self.avg_net_worth(name),
                self.insolvencies.get(name).copied().unwrap_or(0),
            ));
        }
        lines.push(format!("  {:>12}: {}", "Draws", self.draws));
        if self.forced_turns > 0 {
            lines.push(format!("  {:>12}: {}", "Forced turns", self.forced_turns));
        }
        if !self.game_durations_ms.is_empty() {
            let total_ms = self.game_durations_ms.iter().sum::<f64>();
            let avg_ms = total_ms / self.game_durations_ms.len() as f64;
            lines.push(format!("  Avg game: {:.1}ms  |  Total: {:.1}s", avg_ms, total_ms / 1000.0));
        }
        lines.join("\n")
    }

    fn record(&mut self, seating: &[String], summary: &GameSummary, elapsed_ms: f64) {
        for outcome in &summary.seats {
            let Some(name) = seating.get(outcome.seat) else {
                continue;
            };
            self.final_cash.entry(name.clone()).or_default().push(outcome.cash);
            self.net_worth.entry(name.clone()).or_default().push(outcome.net_worth);
            if outcome.is_insolvent() {
                *self.insolvencies.entry(name.clone()).or_default() += 1;
            }
        }
        match summary.richest().and_then(|seat| seating.get(seat)) {
            Some(name) => *self.wins.entry(name.clone()).or_default() += 1,
            None => self.draws += 1,
        }
        self.forced_turns += summary.forced_turns;
        self.game_durations_ms.push(elapsed_ms);
    }
}

/// Which entrant sits in each seat for game `game_idx`.
fn seating(entrants: &[Entrant], game_idx: usize, alternate: bool) -> Vec<String> {
    let shift = if alternate { game_idx } else { 0 };
    (0..SEAT_COUNT)
        .map(|seat| entrants[(seat + shift) % entrants.len()].name.clone())
        .collect()
}

/// Run the arena. Entrants fill the four seats cyclically; with fewer than
/// four, some take more than one seat.
pub fn run_arena(entrants: &[Entrant], rules: &RulesConfig, settings: &ArenaSettings) -> ArenaResult {
    let mut result = ArenaResult {
        num_games: settings.num_games,
        wins: entrants.iter().map(|e| (e.name.clone(), 0)).collect(),
        ..ArenaResult::default()
    };
    if entrants.is_empty() {
        return result;
    }

    let outcomes: Vec<(Vec<String>, GameSummary, f64)> = (0..settings.num_games)
        .into_par_iter()
        .map(|game_idx| {
            let seed = settings.base_seed + game_idx as u64;
            let seats = seating(entrants, game_idx, settings.alternate_seats);
            let strategies: Vec<Box<dyn BotStrategy>> = seats
                .iter()
                .enumerate()
                .map(|(seat, name)| {
                    let profile = entrants
                        .iter()
                        .find(|e| &e.name == name)
                        .map(|e| e.profile.clone())
                        .unwrap_or_default();
                    profile.to_strategy(seed.wrapping_mul(31).wrapping_add(seat as u64))
                })
                .collect();
            let refs: Vec<&dyn BotStrategy> = strategies.iter().map(|s| s.as_ref()).collect();

            let config = GameConfig {
                game_id: game_idx as u64,
                random_seed: Some(seed),
            };
            let mut game = Game::new(config, rules.clone());
            let t0 = Instant::now();
            let summary = play_game(&mut game, &refs, settings.turns_per_game);
            let elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0;
            (seats, summary, elapsed_ms)
        })
        .collect();

    for (seats, summary, elapsed_ms) in &outcomes {
        result.record(seats, summary, *elapsed_ms);
    }
    tracing::info!(games = settings.num_games, draws = result.draws, "arena finished");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entrants() -> Vec<Entrant> {
        vec![
            Entrant::new("greedy", BotProfile::default()),
            Entrant::new(
                "random",
                BotProfile {
                    strategy_type: "random".into(),
                    ..BotProfile::default()
                },
            ),
        ]
    }

    #[test]
    fn test_arena_counts_every_game() {
        let settings = ArenaSettings {
            num_games: 4,
            turns_per_game: 40,
            ..ArenaSettings::default()
        };
        let result = run_arena(&entrants(), &RulesConfig::default(), &settings);
        assert_eq!(result.num_games, 4);
        assert_eq!(result.wins.values().sum::<usize>() + result.draws, 4);
        // Two entrants over four seats: each sits twice per game.
        assert_eq!(result.final_cash["greedy"].len(), 8);
        assert_eq!(result.net_worth["random"].len(), 8);
        assert!(result.summary().contains("Arena Results (4 games)"));
    }

    #[test]
    fn test_arena_is_deterministic() {
        let settings = ArenaSettings {
            num_games: 3,
            turns_per_game: 30,
            alternate_seats: false,
            ..ArenaSettings::default()
        };
        let a = run_arena(&entrants(), &RulesConfig::default(), &settings);
        let b = run_arena(&entrants(), &RulesConfig::default(), &settings);
        assert_eq!(a.final_cash, b.final_cash);
        assert_eq!(a.wins, b.wins);
    }

    #[test]
    fn test_seating_rotates() {
        let e = entrants();
        assert_eq!(seating(&e, 0, true), vec!["greedy", "random", "greedy", "random"]);
        assert_eq!(seating(&e, 1, true), vec!["random", "greedy", "random", "greedy"]);
        assert_eq!(seating(&e, 1, false), vec!["greedy", "random", "greedy", "random"]);
    }
}
