//! # Engine Configuration Module
//!
//! Static display and link settings for the transformation engine, loaded
//! once at startup from a YAML/JSON file or from the environment.
//! Configuration is immutable after loading.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable holding an inline JSON configuration.
pub const CONFIG_ENV_VAR: &str = "HERALD_CONFIG";

fn default_profile_base_url() -> String {
    "https://bitbucket.org/".to_string()
}

fn default_avatar_url() -> String {
    "https://bitbucket.org/account/default-avatar/".to_string()
}

fn default_max_push_changes() -> usize {
    4
}

/// Engine-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Base URL a username is appended to when composing an author profile
    /// link.
    #[serde(default = "default_profile_base_url")]
    pub profile_base_url: String,

    /// Icon used for authors whose payload record carries no link
    /// information.
    #[serde(default = "default_avatar_url")]
    pub default_avatar_url: String,

    /// Maximum number of push changes rendered per delivery; the rest are
    /// dropped.
    #[serde(default = "default_max_push_changes")]
    pub max_push_changes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            profile_base_url: default_profile_base_url(),
            default_avatar_url: default_avatar_url(),
            max_push_changes: default_max_push_changes(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a file path.
    ///
    /// The format is chosen by extension (`.yaml`/`.yml` or `.json`); any
    /// other extension is tried as JSON first, then YAML.
    ///
    /// # Errors
    /// - `ConfigError::FileNotFound` - configuration file missing
    /// - `ConfigError::Parse` - invalid YAML/JSON syntax
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            message: format!("Failed to read file: {}", e),
        })?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let config: EngineConfig = match extension.to_lowercase().as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
                message: format!("Invalid YAML: {}", e),
            })?,
            "json" => serde_json::from_str(&contents).map_err(|e| ConfigError::Parse {
                message: format!("Invalid JSON: {}", e),
            })?,
            _ => serde_json::from_str(&contents)
                .or_else(|_| serde_yaml::from_str(&contents))
                .map_err(|e| ConfigError::Parse {
                    message: format!("Failed to parse as JSON or YAML: {}", e),
                })?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the `HERALD_CONFIG` environment variable
    /// (inline JSON).
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let config_str = std::env::var(CONFIG_ENV_VAR).map_err(|_| {
            ConfigError::SourceUnavailable(format!("{} environment variable not set", CONFIG_ENV_VAR))
        })?;

        let config: EngineConfig =
            serde_json::from_str(&config_str).map_err(|e| ConfigError::Parse {
                message: format!("Invalid JSON: {}", e),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate settings after loading.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_push_changes == 0 {
            return Err(ConfigError::Invalid {
                message: "max_push_changes must be at least 1".to_string(),
            });
        }

        if self.profile_base_url.is_empty() {
            return Err(ConfigError::Invalid {
                message: "profile_base_url must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Configuration parse error: {message}")]
    Parse { message: String },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration source unavailable: {0}")]
    SourceUnavailable(String),
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
