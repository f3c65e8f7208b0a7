//! Data types shared between the game core and its callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::state::Action;

pub type PlayerId = String;

/// Seat index into the player list (0-based).
pub type Seat = usize;

pub const SEAT_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub player_id: PlayerId,
    pub display_name: String,
    pub color: String,
}

impl Player {
    pub fn new(player_id: &str, display_name: &str, color: &str) -> Self {
        Self {
            player_id: player_id.into(),
            display_name: display_name.into(),
            color: color.into(),
        }
    }

    /// The four canonical seats every session starts with.
    pub fn default_seats() -> Vec<Player> {
        vec![
            Player::new("P1", "Blue", "#4da3ff"),
            Player::new("P2", "Red", "#ff6b6b"),
            Player::new("P3", "Green", "#3ecf8e"),
            Player::new("P4", "Yellow", "#ffd166"),
        ]
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConfig {
    /// Identifier the remote authority knows this game by.
    #[serde(default)]
    pub game_id: u64,
    pub random_seed: Option<u64>,
}

/// A recorded session: the seed plus the actions to replay, in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionScript {
    #[serde(default)]
    pub game_id: u64,
    pub seed: Option<u64>,
    pub actions: Vec<Action>,
}

impl ActionScript {
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            game_id: self.game_id,
            random_seed: self.seed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Good,
    Warn,
    Info,
}

/// One human-readable line in the activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub severity: Severity,
    pub title: String,
    pub body: String,
    pub timestamp: DateTime<Utc>,
}

impl ActivityEntry {
    pub fn new(severity: Severity, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.into(),
            body: body.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn good(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(Severity::Good, title, body)
    }

    pub fn warn(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(Severity::Warn, title, body)
    }

    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(Severity::Info, title, body)
    }
}

/// Format a signed money delta the way the feed shows it: `+$75`, `-$50`.
pub fn money(amount: i64) -> String {
    if amount >= 0 {
        format!("+${}", amount)
    } else {
        format!("-${}", -amount)
    }
}
