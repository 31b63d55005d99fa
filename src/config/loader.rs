use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/cyberqr/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("cyberqr").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    /// - Returns an error if reading, parsing, or validation fails.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - The server bind address is a valid socket address
    /// - XP rewards are positive
    /// - Streak badge thresholds are at least 1 day, level badges at least level 2
    /// - The navigation history keeps at least one entry
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::ValidationError {
                message: format!("Invalid bind address '{}'", self.server.bind_addr),
            });
        }

        if self.rewards.safe_scan_xp == 0 || self.rewards.threat_detected_xp == 0 {
            return Err(ConfigError::ValidationError {
                message: "Scan XP rewards must be greater than zero".to_string(),
            });
        }

        if self.rewards.streak_badges.contains(&0) {
            return Err(ConfigError::ValidationError {
                message: "rewards.streak_badges thresholds must be at least 1".to_string(),
            });
        }

        // Every user starts at level 1, so a level-1 badge would be free
        if self.rewards.level_badges.iter().any(|&level| level < 2) {
            return Err(ConfigError::ValidationError {
                message: "rewards.level_badges thresholds must be at least 2".to_string(),
            });
        }

        if self.navigation.history_limit == 0 {
            return Err(ConfigError::ValidationError {
                message: "navigation.history_limit must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}
