use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::utils::{app_data_dir, config_file, ensure_dir};
use crate::errors::{LedgerError, Result};

const TMP_SUFFIX: &str = "tmp";

/// User-configurable preferences and remembered session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_user: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "pt-BR".into(),
            currency: "BRL".into(),
            storage_root: None,
            last_user: None,
        }
    }
}

/// Loads and saves the preferences file with atomic writes.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(config_file()))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data).map_err(|err| LedgerError::Config(err.to_string()))
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| LedgerError::Config(err.to_string()))?;
        let tmp = self.path.with_extension(TMP_SUFFIX);
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Root directory for the document store, honoring the configured
    /// override.
    pub fn resolve_storage_root(&self, config: &Config) -> PathBuf {
        config.storage_root.clone().unwrap_or_else(app_data_dir)
    }
}
