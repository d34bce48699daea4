//! Configuration management for Galleria.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Every section implements `Default`, so a partial file is valid.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Galleria.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Photo library settings
    pub library: LibraryConfig,

    /// Worker pool settings
    pub pool: PoolConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load `config.toml` from the platform config directory, or defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_or_default(&Self::default_path())
    }

    /// Load `path` if it exists; a missing file means all defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    /// Load and validate a config file that must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// `config.toml` in the platform config directory
    /// (`~/.config/galleria` on Linux), or `~/.galleria` when the platform
    /// directories cannot be determined.
    pub fn default_path() -> PathBuf {
        let dir = match directories::ProjectDirs::from("com", "galleria", "galleria") {
            Some(dirs) => dirs.config_dir().to_path_buf(),
            None => directories::BaseDirs::new()
                .map(|base| base.home_dir().join(".galleria"))
                .unwrap_or_else(|| PathBuf::from(".galleria")),
        };
        dir.join("config.toml")
    }

    /// The library root with a leading `~` expanded.
    pub fn image_root(&self) -> PathBuf {
        let root = self.library.root.to_string_lossy();
        PathBuf::from(shellexpand::tilde(&root).into_owned())
    }

    /// Render as TOML, e.g. for `galleria config show`.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
