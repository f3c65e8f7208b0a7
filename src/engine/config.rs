//! Rules and session configuration, loaded from TOML at startup.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::activity::DEFAULT_ACTIVITY_CAPACITY;
use crate::engine::bot_profiles::BotProfile;
use crate::engine::models::ActionScript;

/// Numeric rules of the game. Every field falls back to the standard value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub starting_cash: i64,
    pub pass_go_bonus: i64,
    pub tax_amount: i64,
    pub bail: i64,
    pub jail_turns: u8,
    /// Shuffle both card decks once at setup using the game seed.
    pub shuffle_decks: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            starting_cash: 1500,
            pass_go_bonus: 200,
            tax_amount: 100,
            bail: 50,
            jail_turns: 3,
            shuffle_decks: true,
        }
    }
}

/// Knobs for the interactive table driver; they never change game results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Pause between generating dice and committing the move, for animation.
    pub roll_delay_ms: u64,
    /// Upper bound on a single remote-authority round trip.
    pub remote_timeout_ms: u64,
    pub activity_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            roll_delay_ms: 420,
            remote_timeout_ms: 2500,
            activity_capacity: DEFAULT_ACTIVITY_CAPACITY,
        }
    }
}

/// Top-level TOML file structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfigFile {
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub profiles: HashMap<String, BotProfile>,
}

/// Load configuration from a TOML file at the given path.
pub fn load_config(path: &Path) -> Result<EngineConfigFile, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    toml::from_str(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

/// Try well-known paths, returning built-in defaults if none is usable.
pub fn load_default_config() -> EngineConfigFile {
    let candidates = [
        "whaleopoly.toml",
        "../whaleopoly.toml",
        "/etc/whaleopoly/whaleopoly.toml",
    ];
    for path in &candidates {
        let p = Path::new(path);
        if p.exists() {
            match load_config(p) {
                Ok(config) => {
                    tracing::info!(path = %p.display(), profiles = config.profiles.len(), "loaded engine config");
                    return config;
                }
                Err(e) => {
                    tracing::warn!(path = %p.display(), error = %e, "failed to load engine config");
                }
            }
        }
    }
    tracing::info!("no whaleopoly.toml found, using built-in defaults");
    EngineConfigFile::default()
}

/// Load a JSON action script (`{ "seed": 7, "actions": [...] }`).
pub fn load_script(path: &Path) -> Result<ActionScript, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    serde_json::from_str(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[rules]
bail = 75

[session]
roll_delay_ms = 0

[profiles.cautious]
strategy_type = "greedy"
reserve = 400
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.rules.bail, 75);
        assert_eq!(config.rules.starting_cash, 1500);
        assert_eq!(config.rules.jail_turns, 3);
        assert_eq!(config.session.roll_delay_ms, 0);
        assert_eq!(config.session.activity_capacity, 25);
        assert_eq!(config.profiles["cautious"].reserve, Some(400));
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[rules]\nbail = \"lots\"").unwrap();
        let err = load_config(file.path()).unwrap_err();
        assert!(err.contains("Failed to parse"));
        assert!(err.contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = load_config(Path::new("/nonexistent/whaleopoly.toml")).unwrap_err();
        assert!(err.starts_with("Failed to read"));
    }

    #[test]
    fn test_script_loads() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{ "seed": 7, "actions": [{{"action":"roll","dice":[3,4]}}, {{"action":"apply_card"}}, {{"action":"end_turn"}}] }}"#
        )
        .unwrap();
        let script = load_script(file.path()).unwrap();
        assert_eq!(script.seed, Some(7));
        assert_eq!(script.game_id, 0);
        assert_eq!(script.actions.len(), 3);
        assert_eq!(script.actions[2], crate::game::state::Action::EndTurn);
    }
}
