//! Configuration loading and management
//!
//! Handles parsing of `quadro.toml` configuration files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Board behaviour
    #[serde(default)]
    pub board: BoardConfig,

    /// Snapshot storage
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Board-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Maximum task description length
    #[serde(default = "default_max_description_len")]
    pub max_description_len: usize,
}

fn default_max_description_len() -> usize {
    200
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            max_description_len: default_max_description_len(),
        }
    }
}

/// Snapshot storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for snapshot files (default: the per-user data directory)
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Storage key the snapshot is addressed by
    #[serde(default = "default_storage_key")]
    pub key: String,
}

fn default_storage_key() -> String {
    crate::storage::SNAPSHOT_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            key: default_storage_key(),
        }
    }
}

impl Config {
    /// Load configuration from a `quadro.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `quadro.toml` from a directory, or return defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = dir.join("quadro.toml");
        if config_path.exists() {
            Self::load(&config_path).unwrap_or_else(|err| {
                tracing::warn!("ignoring invalid quadro.toml: {err}");
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.board.max_description_len == 0 {
            return Err(Error::InvalidConfig(
                "board.max_description_len must be > 0".to_string(),
            ));
        }

        let key = self.storage.key.trim();
        if key.is_empty() {
            return Err(Error::InvalidConfig(
                "storage.key cannot be empty".to_string(),
            ));
        }
        if !key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
        {
            return Err(Error::InvalidConfig(
                "storage.key must be alphanumeric (plus - and _)".to_string(),
            ));
        }

        Ok(())
    }
}
