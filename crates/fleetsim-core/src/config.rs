//! Configuration
//!
//! Runtime settings stored as `config.json`. Every field has a default, so a
//! partial file (or no file at all) is valid.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors loading, saving or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Could not find a configuration directory")]
    NoConfigDir,
}

/// Top-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    /// Vehicles built at startup
    pub fleet_size: usize,

    /// Driver loop cadence in milliseconds
    pub tick_interval_ms: u64,

    /// Seed for the simulator's random source (entropy when absent)
    pub seed: Option<u64>,

    /// Text-generation backend settings
    pub summarizer: SummarizerConfig,
}

/// Text-generation backend settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Model name
    pub model: String,

    /// API base URL
    pub endpoint: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            fleet_size: 8,
            tick_interval_ms: 1000,
            seed: None,
            summarizer: SummarizerConfig::default(),
        }
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            model: "gemini-3-flash-preview".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key_env: "API_KEY".to_string(),
            timeout_secs: 30,
        }
    }
}

impl FleetConfig {
    /// Default config location (`<config dir>/fleetsim/config.json`)
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(base.join("fleetsim").join("config.json"))
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: FleetConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Write the config as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the driver loop cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fleet_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "fleet_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tick_interval_ms",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.summarizer.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "summarizer.timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Driver loop cadence
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Simulated seconds per tick
    pub fn dt_seconds(&self) -> f64 {
        self.tick_interval().as_secs_f64()
    }
}

impl SummarizerConfig {
    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// API key from the configured environment variable, if set and non-empty
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}
