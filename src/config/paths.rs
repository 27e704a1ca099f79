//! Path management for Stockbook
//!
//! Provides XDG-compliant path resolution for configuration, data, and the audit log.
//!
//! ## Path Resolution Order
//!
//! 1. `STOCKBOOK_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/stockbook` or `~/.config/stockbook`
//! 3. Windows: `%APPDATA%\stockbook`

use std::path::PathBuf;

use crate::error::StockbookError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "STOCKBOOK_DATA_DIR";

/// Manages all paths used by Stockbook
#[derive(Debug, Clone)]
pub struct StockbookPaths {
    /// Base directory for all Stockbook data
    base_dir: PathBuf,
}

impl StockbookPaths {
    /// Create a new StockbookPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, StockbookError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create StockbookPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/stockbook/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/stockbook/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    pub fn categories_file(&self) -> PathBuf {
        self.data_dir().join("categories.json")
    }

    pub fn items_file(&self) -> PathBuf {
        self.data_dir().join("items.json")
    }

    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir().join("transactions.json")
    }

    /// Get the path to settings.json (well-known inventory settings records)
    pub fn inventory_settings_file(&self) -> PathBuf {
        self.data_dir().join("settings.json")
    }

    pub fn users_file(&self) -> PathBuf {
        self.data_dir().join("users.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), StockbookError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| StockbookError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| StockbookError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if Stockbook has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, StockbookError> {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(config_home).join("stockbook"));
    }

    let home = std::env::var("HOME")
        .map_err(|_| StockbookError::Config("HOME environment variable not set".into()))?;
    Ok(PathBuf::from(home).join(".config").join("stockbook"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, StockbookError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| StockbookError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("stockbook"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StockbookPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(paths.audit_log(), temp_dir.path().join("audit.log"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StockbookPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.base_dir().exists());
        assert!(paths.data_dir().exists());
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StockbookPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(
            paths.items_file(),
            temp_dir.path().join("data").join("items.json")
        );
        assert_eq!(
            paths.inventory_settings_file(),
            temp_dir.path().join("data").join("settings.json")
        );
    }
}
