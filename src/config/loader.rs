use std::fs;
use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use thiserror::Error;

use crate::config::types::FollowConfig;

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

impl FollowConfig {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/tailview/config.toml` on Unix/macOS, or equivalent on
    /// other platforms via `dirs::config_dir()`. Falls back to the current
    /// directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("tailview").join("config.toml")
    }

    /// Loads configuration from the default config file.
    ///
    /// - If the file doesn't exist, returns `FollowConfig::default()`.
    /// - If the file exists, parses it as TOML and validates.
    /// - Returns an error if reading, parsing, or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`, with the same missing-file and
    /// validation behavior as [`load`](Self::load).
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(FollowConfig::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: FollowConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - The timestamp format is non-empty
    /// - The timestamp format contains no specifier chrono cannot render
    ///   (rendering an invalid specifier would panic at stamp time)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timestamp_format.is_empty() {
            return Err(ConfigError::ValidationError {
                message: "timestamp_format must not be empty".to_string(),
            });
        }

        let invalid = StrftimeItems::new(&self.timestamp_format)
            .any(|item| matches!(item, Item::Error));
        if invalid {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "timestamp_format '{}' contains an unsupported specifier",
                    self.timestamp_format
                ),
            });
        }

        Ok(())
    }
}
