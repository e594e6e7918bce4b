//! Configuration schema: game rules plus headless simulation settings.
//!
//! Loaded from YAML. Every section and field has a default, so an empty
//! document is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Scoring thresholds.
    #[serde(default)]
    pub rules: RulesConfig,

    /// Self-play simulation settings (`cm-sim`).
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Game thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RulesConfig {
    /// Minimum first bank for a player's points to start counting.
    #[serde(default = "default_opening_threshold")]
    pub opening_threshold: u32,
    /// Total that ends the game.
    #[serde(default = "default_winning_threshold")]
    pub winning_threshold: u32,
}

fn default_opening_threshold() -> u32 {
    750
}

fn default_winning_threshold() -> u32 {
    5000
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            opening_threshold: default_opening_threshold(),
            winning_threshold: default_winning_threshold(),
        }
    }
}

impl RulesConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.winning_threshold == 0 {
            return Err(ConfigError::Invalid(
                "rules.winning_threshold must be positive".to_string(),
            ));
        }
        if self.opening_threshold > self.winning_threshold {
            return Err(ConfigError::Invalid(format!(
                "rules.opening_threshold ({}) exceeds rules.winning_threshold ({})",
                self.opening_threshold, self.winning_threshold
            )));
        }
        Ok(())
    }
}

/// Headless self-play settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// Number of games to play.
    #[serde(default = "default_sim_games")]
    pub games: u32,
    /// Players seated per game.
    #[serde(default = "default_sim_players")]
    pub players: u32,
    /// Base seed; game `i` uses `seed ^ i`.
    #[serde(default)]
    pub seed: u64,
    /// Bank as soon as the turn total reaches this (and the opening threshold, if unopened).
    #[serde(default = "default_sim_bank_at")]
    pub bank_at: u32,
    /// Safety cap on turns per game before it is abandoned.
    #[serde(default = "default_sim_max_turns")]
    pub max_turns_per_game: u32,
}

fn default_sim_games() -> u32 {
    100
}

fn default_sim_players() -> u32 {
    2
}

fn default_sim_bank_at() -> u32 {
    350
}

fn default_sim_max_turns() -> u32 {
    2000
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            games: default_sim_games(),
            players: default_sim_players(),
            seed: 0,
            bank_at: default_sim_bank_at(),
            max_turns_per_game: default_sim_max_turns(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yaml rejects an empty document; treat it as all defaults.
        if yaml.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config = serde_yaml::from_str(yaml)?;
        config.rules.validate()?;
        Ok(config)
    }
}
