//! Configuration management
//!
//! This module handles loading and managing configuration from:
//! - Environment variables
//! - Configuration files (TOML)
//! - Defaults

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable that overrides the configured seed
pub const SEED_ENV_VAR: &str = "MARKOV_WALK_SEED";

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub chain: ChainConfig,

    #[serde(default)]
    pub walk: WalkConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Transition graph settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChainConfig {
    /// Fixed seed for the graph's generator. Seeded from OS entropy when unset.
    pub seed: Option<u64>,
}

/// Random walk settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Maximum number of transitions taken by a single walk
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_max_steps() -> usize {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config file {:?}: {}", path, e)))?;

        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Searches [`search_paths`](Self::search_paths) in order and falls back
    /// to defaults when none exists.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::search_paths())
    }

    /// Default config file locations, in priority order:
    /// 1. ./markov-walk.toml
    /// 2. ~/.markov-walk/config.toml
    /// 3. /etc/markov-walk/config.toml
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("markov-walk.toml")];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".markov-walk").join("config.toml"));
        }
        paths.push(PathBuf::from("/etc/markov-walk/config.toml"));
        paths
    }

    /// Load the first existing file among `paths`, or defaults if none exists
    pub fn load_from(paths: &[PathBuf]) -> Result<Self> {
        for path in paths {
            if path.exists() {
                tracing::info!("Loading config from {:?}", path);
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Get the generator seed from environment or config
    ///
    /// Priority: environment variable > config file. An environment value
    /// that is not a valid `u64` is an error rather than silently ignored.
    pub fn seed(&self) -> Result<Option<u64>> {
        self.resolve_seed(std::env::var(SEED_ENV_VAR).ok().as_deref())
    }

    fn resolve_seed(&self, env_value: Option<&str>) -> Result<Option<u64>> {
        match env_value {
            Some(raw) => raw.trim().parse::<u64>().map(Some).map_err(|e| {
                Error::Config(format!("Invalid {} value {:?}: {}", SEED_ENV_VAR, raw, e))
            }),
            None => Ok(self.chain.seed),
        }
    }
}
