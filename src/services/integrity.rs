//! Referential integrity between categories and items
//!
//! Items may only point at live categories, and deleting a category deletes
//! its items. The cascade runs in three steps: validate the category exists,
//! delete the children, delete the parent. Children go first so a failure
//! part-way never leaves items pointing at a category that is already gone.

use tracing::{info, warn};

use crate::audit::EntityType;
use crate::error::{StockbookError, StockbookResult};
use crate::models::{Category, CategoryId};
use crate::storage::Storage;

/// Result of a category cascade delete
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeOutcome {
    /// The removed category
    pub category: Category,
    /// Number of items removed with it
    pub deleted_items: usize,
}

/// Service enforcing the category → item relationship
pub struct IntegrityService<'a> {
    storage: &'a Storage,
}

impl<'a> IntegrityService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// The category an item is about to reference. Called immediately before
    /// every item write that sets a category.
    pub fn require_category(&self, id: CategoryId) -> StockbookResult<Category> {
        self.storage
            .categories
            .get(id)?
            .ok_or_else(|| StockbookError::category_not_found(id.to_string()))
    }

    /// Delete a category and every item that references it
    pub fn delete_category_cascade(&self, id: CategoryId) -> StockbookResult<CascadeOutcome> {
        // Validate
        let category = self.require_category(id)?;

        // Children
        let children = self.storage.items.get_by_category(id)?;
        let deleted_items = self.storage.items.delete_by_category(id)?;
        if deleted_items != children.len() {
            warn!(
                category = %category.id,
                expected = children.len(),
                deleted_items,
                "item count changed during cascade"
            );
        }
        self.storage.items.save()?;

        // Parent
        self.storage.categories.delete(id)?;
        self.storage.categories.save()?;

        for item in &children {
            self.storage.log_delete(
                EntityType::Item,
                item.id.to_string(),
                Some(item.name.clone()),
                item,
            );
        }
        self.storage.log_delete(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        );

        info!(
            id = %category.id,
            name = %category.name,
            deleted_items,
            "category deleted"
        );

        Ok(CascadeOutcome {
            category,
            deleted_items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::StockbookPaths;
    use crate::models::{Item, Money};
    use crate::services::CategoryService;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = StockbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn stock(storage: &Storage, category: CategoryId, count: usize) {
        for i in 0..count {
            storage
                .items
                .upsert(Item::new(
                    format!("Item {}", i),
                    category,
                    i as u32,
                    Money::from_cents(100),
                ))
                .unwrap();
        }
    }

    #[test]
    fn test_cascade_reports_deleted_items() {
        let (_temp_dir, storage) = create_test_storage();
        let categories = CategoryService::new(&storage);
        let tools = categories.create("Tools").unwrap();
        let books = categories.create("Books").unwrap();
        stock(&storage, tools.id, 4);
        stock(&storage, books.id, 2);

        let outcome = IntegrityService::new(&storage)
            .delete_category_cascade(tools.id)
            .unwrap();

        assert_eq!(outcome.deleted_items, 4);
        assert_eq!(outcome.category.id, tools.id);
        assert!(storage.categories.get(tools.id).unwrap().is_none());
        assert_eq!(storage.categories.count().unwrap(), 1);
        assert_eq!(storage.items.count().unwrap(), 2);
        assert!(storage
            .items
            .get_all()
            .unwrap()
            .iter()
            .all(|i| i.category_id != tools.id));
    }

    #[test]
    fn test_cascade_commits_when_audit_log_is_unwritable() {
        let (_temp_dir, storage) = create_test_storage();
        let tools = CategoryService::new(&storage).create("Tools").unwrap();
        stock(&storage, tools.id, 4);
        std::fs::create_dir_all(storage.paths().audit_log()).unwrap();

        let outcome = IntegrityService::new(&storage)
            .delete_category_cascade(tools.id)
            .unwrap();

        assert_eq!(outcome.deleted_items, 4);
        assert!(storage.categories.get(tools.id).unwrap().is_none());
        assert_eq!(storage.items.count().unwrap(), 0);
    }

    #[test]
    fn test_cascade_on_empty_category() {
        let (_temp_dir, storage) = create_test_storage();
        let tools = CategoryService::new(&storage).create("Tools").unwrap();

        let outcome = IntegrityService::new(&storage)
            .delete_category_cascade(tools.id)
            .unwrap();
        assert_eq!(outcome.deleted_items, 0);
        assert_eq!(storage.categories.count().unwrap(), 0);
    }

    #[test]
    fn test_cascade_missing_category_changes_nothing() {
        let (_temp_dir, storage) = create_test_storage();
        let tools = CategoryService::new(&storage).create("Tools").unwrap();
        stock(&storage, tools.id, 3);

        let err = IntegrityService::new(&storage)
            .delete_category_cascade(CategoryId::new())
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(storage.items.count().unwrap(), 3);
        assert_eq!(storage.categories.count().unwrap(), 1);
    }

    #[test]
    fn test_cascade_is_persisted() {
        let (temp_dir, storage) = create_test_storage();
        let tools = CategoryService::new(&storage).create("Tools").unwrap();
        stock(&storage, tools.id, 2);
        storage.items.save().unwrap();

        IntegrityService::new(&storage)
            .delete_category_cascade(tools.id)
            .unwrap();

        let paths = StockbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut reopened = Storage::new(paths).unwrap();
        reopened.load_all().unwrap();
        assert_eq!(reopened.items.count().unwrap(), 0);
        assert_eq!(reopened.categories.count().unwrap(), 0);
    }

    #[test]
    fn test_require_category() {
        let (_temp_dir, storage) = create_test_storage();
        let service = IntegrityService::new(&storage);

        let err = service.require_category(CategoryId::new()).unwrap_err();
        assert_eq!(err.public_message().as_deref(), Some("Category not found"));
    }
}
