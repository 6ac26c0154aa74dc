//! Configuration management for the thumbnail service.
//!
//! Configuration is loaded from `./config/config.toml` (or `config-local.toml`
//! when `ENVIRONMENT=DEV`), then from the platform config directory, falling
//! back to defaults when no file exists.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable selecting the config file variant.
pub const ENVIRONMENT_VAR: &str = "ENVIRONMENT";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Destination directories
    pub storage: StorageConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the first config file found.
    ///
    /// Returns default configuration if no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::candidate_paths().into_iter().find(|p| p.exists()) {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                Self::load_from(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Config file name for the current environment.
    pub fn file_name() -> &'static str {
        Self::file_name_for(std::env::var(ENVIRONMENT_VAR).ok().as_deref())
    }

    /// Config file name for an explicit environment value.
    pub fn file_name_for(environment: Option<&str>) -> &'static str {
        match environment {
            Some("DEV") => "config-local.toml",
            _ => "config.toml",
        }
    }

    /// Paths searched by [`Config::load`], in priority order.
    pub fn candidate_paths() -> Vec<PathBuf> {
        vec![
            PathBuf::from("config").join(Self::file_name()),
            Self::default_path(),
        ]
    }

    /// Get the platform config file path.
    ///
    /// - macOS: ~/Library/Application Support/com.thumbnail.thumbnail/config.toml
    /// - Linux: ~/.config/thumbnail/config.toml
    ///
    /// Falls back to ~/.thumbnail/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "thumbnail", "thumbnail")
            .map(|dirs| dirs.config_dir().join(Self::file_name()))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".thumbnail").join(Self::file_name())
            })
    }

    /// Resolved destination directory for an ingress path (with ~ expansion).
    pub fn storage_dir(&self, ingress: Ingress) -> PathBuf {
        let dir = match ingress {
            Ingress::Multipart => &self.storage.multipart_dir,
            Ingress::Base64 => &self.storage.base64_dir,
            Ingress::Reference => &self.storage.reference_dir,
        };
        let path_str = dir.to_string_lossy();
        let expanded = shellexpand::tilde(&path_str);
        PathBuf::from(expanded.into_owned())
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
