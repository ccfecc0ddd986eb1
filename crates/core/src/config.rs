//! Tracker configuration, loaded from a YAML file.
//!
//! Every field has a default, so an empty file (or no file at all) is a
//! valid configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::CoreError;
use crate::storage::encryption::KdfParams;
use crate::storage::file_store::FileStore;

/// Where and how the ledger is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the key-value file
    pub path: PathBuf,
    /// Seal the file with a password
    pub encrypted: bool,
    /// Argon2id parameters used when sealing
    pub kdf: KdfParams,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("expense-tracker.json"),
            encrypted: false,
            kdf: KdfParams::default(),
        }
    }
}

impl StorageConfig {
    /// Open the configured file store. `password` is required for sealed
    /// stores and ignored otherwise.
    pub fn open_store(&self, password: Option<&str>) -> Result<FileStore, CoreError> {
        if !self.encrypted {
            return FileStore::open(&self.path);
        }
        let password = password.ok_or_else(|| {
            CoreError::Config("storage is encrypted but no password was given".into())
        })?;
        FileStore::open_sealed(&self.path, password, self.kdf)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing-subscriber` filter directive; `RUST_LOG` takes precedence
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "expense_tracker=info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl TrackerConfig {
    /// Read and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_yaml(&text)?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Like [`TrackerConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            debug!(path = %path.display(), "no configuration file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_yaml(text: &str) -> Result<Self, CoreError> {
        // serde_yaml rejects an empty document; treat it as "all defaults"
        let config: Self = if text.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(text)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.storage.path.as_os_str().is_empty() {
            return Err(CoreError::Config("storage.path must not be empty".into()));
        }
        self.storage
            .kdf
            .validate()
            .map_err(|e| CoreError::Config(format!("storage.kdf: {e}")))?;
        Ok(())
    }
}
