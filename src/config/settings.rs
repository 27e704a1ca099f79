//! Application settings for Stockbook
//!
//! Process-level preferences stored in `config.json`: log filter, audit trail,
//! output formatting and the identity the CLI presents to the session layer.
//! Inventory rules (financial gate, low-stock threshold) are not here; they
//! live in the setting store so they can be toggled at runtime.

use serde::{Deserialize, Serialize};

use super::paths::StockbookPaths;
use crate::error::StockbookError;

/// Application settings for Stockbook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Default tracing filter (overridden by `STOCKBOOK_LOG`)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether mutations are appended to the audit log
    #[serde(default = "default_true")]
    pub audit_enabled: bool,

    /// Currency symbol used by table output
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Pretty-print JSON responses
    #[serde(default = "default_true")]
    pub pretty_json: bool,

    /// Email of the signed-in user, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal_email: Option<String>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_currency() -> String {
    "$".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            log_level: default_log_level(),
            audit_enabled: true,
            currency_symbol: default_currency(),
            pretty_json: true,
            principal_email: None,
        }
    }
}

impl AppSettings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &StockbookPaths) -> Result<Self, StockbookError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                StockbookError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: AppSettings = serde_json::from_str(&contents).map_err(|e| {
                StockbookError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(AppSettings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &StockbookPaths) -> Result<(), StockbookError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            StockbookError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            StockbookError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}
