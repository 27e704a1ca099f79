//! Setting repository for JSON storage
//!
//! Settings are keyed singletons. Writes go through `upsert`, which creates
//! the record on first write and replaces it afterwards; the key is never
//! duplicated and records are never deleted.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::Utc;
use serde_json::Value;

use crate::error::StockbookError;
use crate::models::Setting;

use super::file_io::{lock_error, read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct SettingData {
    settings: Vec<Setting>,
}

/// Repository for setting persistence, keyed by setting key
pub struct SettingRepository {
    path: PathBuf,
    data: RwLock<HashMap<String, Setting>>,
}

impl SettingRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load settings from disk
    pub fn load(&self) -> Result<(), StockbookError> {
        let file_data: SettingData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        data.clear();
        for setting in file_data.settings {
            data.insert(setting.key.clone(), setting);
        }

        Ok(())
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<(), StockbookError> {
        let file_data = SettingData {
            settings: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a setting by key
    pub fn get_by_key(&self, key: &str) -> Result<Option<Setting>, StockbookError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(key).cloned())
    }

    /// Get all settings, sorted by key
    pub fn get_all(&self) -> Result<Vec<Setting>, StockbookError> {
        let data = self.data.read().map_err(lock_error)?;
        let mut list: Vec<_> = data.values().cloned().collect();
        list.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(list)
    }

    /// Create or replace the record for `key`.
    ///
    /// A `None` flag keeps the existing record's flag, or `true` for a new
    /// record. Returns the stored record and the previous one, if any.
    pub fn upsert(
        &self,
        key: &str,
        value: Value,
        financial_tracking_enabled: Option<bool>,
    ) -> Result<(Setting, Option<Setting>), StockbookError> {
        let mut data = self.data.write().map_err(lock_error)?;

        let previous = data.get(key).cloned();
        let setting = match &previous {
            Some(existing) => {
                let mut updated = existing.clone();
                updated.value = value;
                if let Some(flag) = financial_tracking_enabled {
                    updated.financial_tracking_enabled = flag;
                }
                updated.updated_at = Utc::now();
                updated
            }
            None => Setting::new(key, value, financial_tracking_enabled.unwrap_or(true)),
        };

        data.insert(key.to_string(), setting.clone());
        Ok((setting, previous))
    }

    /// Remove every record (used by sample-data seeding)
    pub fn clear(&self) -> Result<(), StockbookError> {
        self.data.write().map_err(lock_error)?.clear();
        Ok(())
    }

    pub fn count(&self) -> Result<usize, StockbookError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FINANCIAL_TRACKING_KEY;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, SettingRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = SettingRepository::new(temp_dir.path().join("settings.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_upsert_creates_then_replaces() {
        let (_temp_dir, repo) = create_test_repo();

        let (created, previous) = repo
            .upsert(FINANCIAL_TRACKING_KEY, json!({"enabled": true}), None)
            .unwrap();
        assert!(previous.is_none());
        assert!(created.financial_tracking_enabled);

        let (updated, previous) = repo
            .upsert(FINANCIAL_TRACKING_KEY, json!({"enabled": false}), Some(false))
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert!(previous.unwrap().financial_tracking_enabled);
        assert!(!updated.financial_tracking_enabled);
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_upsert_without_flag_keeps_existing_flag() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert(FINANCIAL_TRACKING_KEY, json!(null), Some(false))
            .unwrap();

        let (updated, _) = repo
            .upsert(FINANCIAL_TRACKING_KEY, json!({"note": "x"}), None)
            .unwrap();
        assert!(!updated.financial_tracking_enabled);
        assert_eq!(updated.value, json!({"note": "x"}));
    }

    #[test]
    fn test_get_all_sorted_and_persisted() {
        let (temp_dir, repo) = create_test_repo();
        repo.upsert("zeta", json!(1), None).unwrap();
        repo.upsert("alpha", json!(2), None).unwrap();
        repo.save().unwrap();

        let repo2 = SettingRepository::new(temp_dir.path().join("settings.json"));
        repo2.load().unwrap();
        let keys: Vec<_> = repo2.get_all().unwrap().into_iter().map(|s| s.key).collect();
        assert_eq!(keys, vec!["alpha", "zeta"]);
        assert!(repo2.get_by_key("missing").unwrap().is_none());
    }
}
