//! Named autopilot profiles, read from the `[profiles.<name>]` tables of
//! `whaleopoly.toml` and used by the CLI and the arena.

use serde::Deserialize;

use crate::engine::bot_strategy::{BotStrategy, GreedyStrategy, RandomStrategy, DEFAULT_RESERVE};

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BotProfile {
    pub description: Option<String>,
    #[serde(default = "default_strategy_type")]
    pub strategy_type: String,

    /// Cash the greedy strategy keeps back before buying or building.
    pub reserve: Option<i64>,
    /// Whether the greedy strategy develops its monopolies.
    pub build: Option<bool>,
}

fn default_strategy_type() -> String {
    "greedy".into()
}

impl Default for BotProfile {
    fn default() -> Self {
        Self {
            description: None,
            strategy_type: default_strategy_type(),
            reserve: None,
            build: None,
        }
    }
}

impl BotProfile {
    /// Build the strategy this profile describes. Unknown types fall back to greedy.
    pub fn to_strategy(&self, seed: u64) -> Box<dyn BotStrategy> {
        match self.strategy_type.as_str() {
            "random" => Box::new(RandomStrategy::new(seed)),
            "greedy" => Box::new(self.to_greedy()),
            other => {
                tracing::warn!(strategy_type = other, "unknown strategy type, using greedy");
                Box::new(self.to_greedy())
            }
        }
    }

    fn to_greedy(&self) -> GreedyStrategy {
        GreedyStrategy {
            reserve: self.reserve.unwrap_or(DEFAULT_RESERVE),
            build: self.build.unwrap_or(true),
        }
    }

    pub fn label(&self) -> String {
        match self.strategy_type.as_str() {
            "random" => "random".into(),
            _ => format!(
                "greedy(reserve={}, build={})",
                self.reserve.unwrap_or(DEFAULT_RESERVE),
                self.build.unwrap_or(true)
            ),
        }
    }
}
