//! Storage layer for Stockbook
//!
//! One JSON file per entity under `data/`, each written atomically. The
//! repositories are the narrow CRUD contract the services work against.

pub mod categories;
pub mod file_io;
pub mod init;
pub mod items;
pub mod settings;
pub mod transactions;
pub mod users;

pub use categories::CategoryRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::{initialize_storage, seed_sample_data, SeedSummary, SEED_ADMIN_EMAIL};
pub use items::ItemRepository;
pub use settings::SettingRepository;
pub use transactions::TransactionRepository;
pub use users::UserRepository;

use serde::Serialize;
use tracing::warn;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::StockbookPaths;
use crate::error::StockbookError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: StockbookPaths,
    pub categories: CategoryRepository,
    pub items: ItemRepository,
    pub transactions: TransactionRepository,
    pub settings: SettingRepository,
    pub users: UserRepository,
    audit: Option<AuditLogger>,
}

impl Storage {
    /// Create a new Storage instance with the audit trail enabled
    pub fn new(paths: StockbookPaths) -> Result<Self, StockbookError> {
        paths.ensure_directories()?;

        Ok(Self {
            categories: CategoryRepository::new(paths.categories_file()),
            items: ItemRepository::new(paths.items_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            settings: SettingRepository::new(paths.inventory_settings_file()),
            users: UserRepository::new(paths.users_file()),
            audit: Some(AuditLogger::new(paths.audit_log())),
            paths,
        })
    }

    /// Turn the audit trail on or off
    pub fn set_audit_enabled(&mut self, enabled: bool) {
        self.audit = enabled.then(|| AuditLogger::new(self.paths.audit_log()));
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &StockbookPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), StockbookError> {
        self.categories.load()?;
        self.items.load()?;
        self.transactions.load()?;
        self.settings.load()?;
        self.users.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), StockbookError> {
        self.categories.save()?;
        self.items.save()?;
        self.transactions.save()?;
        self.settings.save()?;
        self.users.save()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Record a create in the audit trail
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        self.log(|| AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Record an update in the audit trail
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) {
        self.log(|| {
            AuditEntry::update(
                entity_type,
                entity_id,
                entity_name,
                before,
                after,
                diff_summary,
            )
        })
    }

    /// Record a delete in the audit trail
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        self.log(|| AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    /// Append to the audit trail. Callers log after their change is saved,
    /// so a failed write is reported here and never fails the operation.
    fn log(&self, entry: impl FnOnce() -> AuditEntry) {
        let Some(logger) = &self.audit else {
            return;
        };
        let entry = entry();
        if let Err(e) = logger.log(&entry) {
            warn!(
                entity_type = ?entry.entity_type,
                entity_id = %entry.entity_id,
                error = %e,
                "audit entry not written"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::models::Category;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StockbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_audit_toggle() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StockbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths.clone()).unwrap();
        let category = Category::new("Tools");

        storage.log_create(EntityType::Category, category.id.to_string(), None, &category);
        storage.set_audit_enabled(false);
        storage.log_delete(EntityType::Category, category.id.to_string(), None, &category);

        let entries = AuditLogger::new(paths.audit_log()).read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
    }

    #[test]
    fn test_save_and_load_all() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StockbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths.clone()).unwrap();
        storage.categories.insert(Category::new("Books")).unwrap();
        storage.save_all().unwrap();

        let mut reopened = Storage::new(paths).unwrap();
        reopened.load_all().unwrap();
        assert_eq!(reopened.categories.count().unwrap(), 1);
        assert_eq!(reopened.items.count().unwrap(), 0);
    }
}
