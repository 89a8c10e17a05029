//! TOML configuration.
//!
//! ```toml
//! [train]
//! game_count = 50000
//! seed = 7
//!
//! [client]
//! call_timeout_ms = 600000
//!
//! [worker]
//! seed = 42
//!
//! [tui]
//! log_file = "brain_games_tui.log"
//! ```
//!
//! Every section and field is optional.

use crate::client::ClientConfig;
use crate::engine::TrainConfig;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Parameters for training runs.
    train: TrainConfig,
    /// Client proxy settings.
    client: ClientConfig,
    /// In-process and stdio worker settings.
    worker: WorkerConfig,
    /// Terminal UI settings.
    tui: TuiConfig,
}

/// Worker settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Seed for the engine's move selection. Random when absent.
    seed: Option<u64>,
}

/// Terminal UI settings.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Log destination; the terminal itself is owned by the UI.
    log_file: PathBuf,
}

fn default_log_file() -> PathBuf {
    PathBuf::from("brain_games_tui.log")
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(games = config.train.game_count, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` when given, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                debug!("No config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Replaces the training parameters.
    pub fn with_train(mut self, train: TrainConfig) -> Self {
        self.train = train;
        self
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
