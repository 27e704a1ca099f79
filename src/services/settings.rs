//! Settings service and the financial feature gate
//!
//! The two well-known records are folded into an [`InventoryConfig`] with
//! defaults applied. An absent `financial_tracking` record means the gate is
//! open.

use serde_json::Value;
use tracing::{debug, info};

use crate::audit::EntityType;
use crate::error::{StockbookError, StockbookResult};
use crate::models::{InventoryConfig, Setting, FINANCIAL_TRACKING_KEY, LOW_STOCK_THRESHOLD_KEY};
use crate::storage::Storage;

/// Service for setting records and the configuration derived from them
pub struct SettingsService<'a> {
    storage: &'a Storage,
}

impl<'a> SettingsService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Whether new transactions may be recorded
    pub fn is_financial_enabled(&self) -> StockbookResult<bool> {
        let enabled = self
            .storage
            .settings
            .get_by_key(FINANCIAL_TRACKING_KEY)?
            .map(|s| s.financial_tracking_enabled)
            .unwrap_or(true);
        debug!(enabled, "financial gate checked");
        Ok(enabled)
    }

    /// Fail with Forbidden when the financial gate is closed
    pub fn ensure_financial_enabled(&self) -> StockbookResult<()> {
        if self.is_financial_enabled()? {
            Ok(())
        } else {
            Err(StockbookError::financial_tracking_disabled())
        }
    }

    /// Typed view of the well-known records
    pub fn config(&self) -> StockbookResult<InventoryConfig> {
        let financial = self.storage.settings.get_by_key(FINANCIAL_TRACKING_KEY)?;
        let threshold = self.storage.settings.get_by_key(LOW_STOCK_THRESHOLD_KEY)?;
        Ok(InventoryConfig::from_records(
            financial.as_ref(),
            threshold.as_ref(),
        ))
    }

    /// All setting records, sorted by key
    pub fn list(&self) -> StockbookResult<Vec<Setting>> {
        self.storage.settings.get_all()
    }

    /// Get one record by key
    pub fn get(&self, key: &str) -> StockbookResult<Option<Setting>> {
        self.storage.settings.get_by_key(key)
    }

    /// Create or replace the record for `key`.
    ///
    /// An omitted flag defaults to `true` on a new record and is left alone on
    /// an existing one.
    pub fn upsert(
        &self,
        key: &str,
        value: Value,
        financial_tracking_enabled: Option<bool>,
    ) -> StockbookResult<Setting> {
        let key = key.trim();
        if key.is_empty() {
            return Err(StockbookError::Validation("Setting key is required".into()));
        }

        let (setting, previous) =
            self.storage
                .settings
                .upsert(key, value, financial_tracking_enabled)?;
        self.storage.settings.save()?;

        match previous {
            Some(before) => self.storage.log_update(
                EntityType::Setting,
                setting.id.to_string(),
                Some(setting.key.clone()),
                &before,
                &setting,
                None,
            ),
            None => self.storage.log_create(
                EntityType::Setting,
                setting.id.to_string(),
                Some(setting.key.clone()),
                &setting,
            ),
        }

        info!(
            key = %setting.key,
            financial_tracking_enabled = setting.financial_tracking_enabled,
            "setting saved"
        );
        Ok(setting)
    }

    /// Flip the financial gate, keeping whatever payload the record already has
    pub fn set_financial_tracking(&self, enabled: bool) -> StockbookResult<Setting> {
        let value = self
            .storage
            .settings
            .get_by_key(FINANCIAL_TRACKING_KEY)?
            .map(|s| s.value)
            .unwrap_or_else(|| serde_json::json!({ "enabled": enabled }));
        self.upsert(FINANCIAL_TRACKING_KEY, value, Some(enabled))
    }

    /// Store a new low-stock threshold
    pub fn set_low_stock_threshold(&self, threshold: u32) -> StockbookResult<Setting> {
        self.upsert(
            LOW_STOCK_THRESHOLD_KEY,
            serde_json::json!({ "threshold": threshold }),
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::StockbookPaths;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = StockbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_absent_record_means_enabled() {
        let (_temp_dir, storage) = create_test_storage();
        let service = SettingsService::new(&storage);

        assert!(service.is_financial_enabled().unwrap());
        assert!(service.ensure_financial_enabled().is_ok());
        assert_eq!(service.config().unwrap(), InventoryConfig::default());
    }

    #[test]
    fn test_disabling_closes_gate() {
        let (_temp_dir, storage) = create_test_storage();
        let service = SettingsService::new(&storage);

        service.set_financial_tracking(false).unwrap();

        assert!(!service.is_financial_enabled().unwrap());
        let err = service.ensure_financial_enabled().unwrap_err();
        assert_eq!(err.kind().status_code(), 403);
    }

    #[test]
    fn test_omitted_flag_preserves_existing() {
        let (_temp_dir, storage) = create_test_storage();
        let service = SettingsService::new(&storage);

        service
            .upsert(FINANCIAL_TRACKING_KEY, json!({"enabled": false}), Some(false))
            .unwrap();
        let updated = service
            .upsert(FINANCIAL_TRACKING_KEY, json!({"note": "kept"}), None)
            .unwrap();

        assert!(!updated.financial_tracking_enabled);
        assert!(!service.is_financial_enabled().unwrap());
    }

    #[test]
    fn test_threshold_setting_feeds_config() {
        let (_temp_dir, storage) = create_test_storage();
        let service = SettingsService::new(&storage);

        service.set_low_stock_threshold(4).unwrap();
        assert_eq!(service.config().unwrap().low_stock_threshold, 4);
    }

    #[test]
    fn test_empty_key_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = SettingsService::new(&storage);

        let err = service.upsert("  ", json!(1), None).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(storage.settings.count().unwrap(), 0);
    }

    #[test]
    fn test_settings_persist() {
        let (temp_dir, storage) = create_test_storage();
        SettingsService::new(&storage)
            .set_financial_tracking(false)
            .unwrap();

        let paths = StockbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut reopened = Storage::new(paths).unwrap();
        reopened.load_all().unwrap();
        assert!(!SettingsService::new(&reopened).is_financial_enabled().unwrap());
    }
}
