use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{LogwardenError, Result};

use super::MaskingConfig;

/// Top-level configuration from `.logwarden/config.yml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub masking: MaskingConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load config from a YAML file. Returns defaults if the file doesn't exist.
    /// The masking section is validated either way.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            serde_yaml::from_str(&contents).map_err(|e| LogwardenError::ConfigParse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
        } else {
            Self::default()
        };
        config.masking.validate()?;
        Ok(config)
    }

    /// Load config for a project root. Checks `.logwarden/config.yml`.
    pub fn load_project(project_root: &Path) -> Result<Self> {
        Self::load_from(&super::config_path(project_root))
    }

    /// Absolute path of the request log file for a project root.
    pub fn log_file(&self, project_root: &Path) -> PathBuf {
        super::project_dir(project_root).join(&self.storage.log_file)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| LogwardenError::InvalidConfig {
            reason: e.to_string(),
        })
    }
}

/// Where request logs are persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSONL file path, relative to `.logwarden/`.
    pub log_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("logs").join("requests.jsonl"),
        }
    }
}

/// Default tracing filter, overridden by `LOGWARDEN_LOG`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}
