//! Category service
//!
//! Create, rename and read categories. Deletion cascades to items and lives in
//! [`IntegrityService`](super::IntegrityService).

use tracing::info;

use crate::audit::EntityType;
use crate::error::{StockbookError, StockbookResult};
use crate::models::{Category, CategoryId};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

/// A category with the number of items currently referencing it
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryWithCount {
    pub category: Category,
    pub item_count: usize,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new category. Fails with a conflict if the exact name is taken.
    pub fn create(&self, name: &str) -> StockbookResult<Category> {
        let category = Category::new(name.trim());
        category
            .validate()
            .map_err(|e| StockbookError::Validation(e.to_string()))?;

        self.storage.categories.insert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_create(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        );

        info!(id = %category.id, name = %category.name, "category created");
        Ok(category)
    }

    /// Get a category with its item count
    pub fn get(&self, id: CategoryId) -> StockbookResult<CategoryWithCount> {
        let category = self
            .storage
            .categories
            .get(id)?
            .ok_or_else(|| StockbookError::category_not_found(id.to_string()))?;
        self.with_count(category)
    }

    /// Find a category by full id or exact name
    pub fn find(&self, identifier: &str) -> StockbookResult<Option<Category>> {
        if let Ok(id) = identifier.parse::<CategoryId>() {
            if let Some(category) = self.storage.categories.get(id)? {
                return Ok(Some(category));
            }
        }
        self.storage.categories.get_by_name(identifier)
    }

    /// All categories sorted by name, each with its item count
    pub fn list(&self) -> StockbookResult<Vec<CategoryWithCount>> {
        self.storage
            .categories
            .get_all()?
            .into_iter()
            .map(|category| self.with_count(category))
            .collect()
    }

    /// Rename a category
    pub fn update(&self, id: CategoryId, name: &str) -> StockbookResult<Category> {
        let mut category = self
            .storage
            .categories
            .get(id)?
            .ok_or_else(|| StockbookError::category_not_found(id.to_string()))?;
        let before = category.clone();

        category.rename(name.trim());
        category
            .validate()
            .map_err(|e| StockbookError::Validation(e.to_string()))?;

        self.storage
            .categories
            .update(category.clone())
            .map_err(|e| match e {
                StockbookError::Duplicate { identifier, .. } => StockbookError::Duplicate {
                    entity_type: "Category name",
                    identifier,
                },
                other => other,
            })?;
        self.storage.categories.save()?;

        self.storage.log_update(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &before,
            &category,
            Some(format!("name: '{}' -> '{}'", before.name, category.name)),
        );

        info!(id = %category.id, name = %category.name, "category renamed");
        Ok(category)
    }

    fn with_count(&self, category: Category) -> StockbookResult<CategoryWithCount> {
        let item_count = self.storage.items.count_by_category(category.id)?;
        Ok(CategoryWithCount {
            category,
            item_count,
        })
    }
}
