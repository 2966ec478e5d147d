use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ConfigError;

const DEFAULT_DIR_NAME: &str = ".cabin_admin";

/// Operator preferences for the admin shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom data directory. Defaults to `~/.cabin_admin`.
    pub data_dir: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,

    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,

    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            data_dir: None,
            log_filter: None,
            backup_retention: Self::default_backup_retention(),
            ui_color_enabled: Self::default_ui_color_enabled(),
        }
    }
}

impl Config {
    pub fn default_backup_retention() -> usize {
        5
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(path) = &self.data_dir {
            return path.clone();
        }

        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.currency.trim().len() != 3 {
            return Err(ConfigError::Invalid {
                key: "currency",
                reason: format!("expected a 3-letter code, got `{}`", self.currency),
            });
        }
        if self.backup_retention == 0 {
            return Err(ConfigError::Invalid {
                key: "backup_retention",
                reason: "must keep at least one backup".into(),
            });
        }
        Ok(())
    }
}
