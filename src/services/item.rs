//! Item service
//!
//! Every write that sets a category re-checks that the category exists
//! immediately beforehand, so an item is never stored against a dangling id.

use std::collections::HashMap;

use chrono::Utc;
use tracing::info;

use crate::audit::EntityType;
use crate::error::{StockbookError, StockbookResult};
use crate::models::{Category, CategoryId, Item, ItemId, Money};
use crate::storage::Storage;

use super::integrity::IntegrityService;

/// Fields of a new item
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub category_id: CategoryId,
    pub quantity: u32,
    pub price: Money,
}

/// Partial update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemChanges {
    pub name: Option<String>,
    pub category_id: Option<CategoryId>,
    pub quantity: Option<u32>,
    pub price: Option<Money>,
}

/// Listing filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemFilter {
    /// Case-insensitive substring of the item name
    pub search: Option<String>,
    pub category_id: Option<CategoryId>,
}

/// An item with its resolved category
#[derive(Debug, Clone, PartialEq)]
pub struct ItemWithCategory {
    pub item: Item,
    pub category: Option<Category>,
}

impl ItemWithCategory {
    /// Resolved category name, empty if the category is gone
    pub fn category_name(&self) -> &str {
        self.category.as_ref().map(|c| c.name.as_str()).unwrap_or("")
    }
}

/// Service for inventory item management
pub struct ItemService<'a> {
    storage: &'a Storage,
}

impl<'a> ItemService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create an item in an existing category
    pub fn create(&self, input: NewItem) -> StockbookResult<ItemWithCategory> {
        let item = Item::new(
            input.name.trim(),
            input.category_id,
            input.quantity,
            input.price,
        );
        item.validate()
            .map_err(|e| StockbookError::Validation(e.to_string()))?;

        let category = IntegrityService::new(self.storage).require_category(item.category_id)?;
        self.storage.items.upsert(item.clone())?;
        self.storage.items.save()?;

        self.storage.log_create(
            EntityType::Item,
            item.id.to_string(),
            Some(item.name.clone()),
            &item,
        );

        info!(id = %item.id, name = %item.name, category = %category.name, "item created");
        Ok(ItemWithCategory {
            item,
            category: Some(category),
        })
    }

    /// Get an item with its category
    pub fn get(&self, id: ItemId) -> StockbookResult<ItemWithCategory> {
        let item = self
            .storage
            .items
            .get(id)?
            .ok_or_else(|| StockbookError::item_not_found(id.to_string()))?;
        let category = self.storage.categories.get(item.category_id)?;
        Ok(ItemWithCategory { item, category })
    }

    /// Items matching the filter, newest first
    pub fn list(&self, filter: &ItemFilter) -> StockbookResult<Vec<ItemWithCategory>> {
        let items = match filter.category_id {
            Some(category_id) => self.storage.items.get_by_category(category_id)?,
            None => self.storage.items.get_all()?,
        };

        let needle = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let categories: HashMap<CategoryId, Category> = self
            .storage
            .categories
            .get_all()?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(items
            .into_iter()
            .filter(|item| match &needle {
                Some(needle) => item.name.to_lowercase().contains(needle),
                None => true,
            })
            .map(|item| {
                let category = categories.get(&item.category_id).cloned();
                ItemWithCategory { item, category }
            })
            .collect())
    }

    /// Apply a partial update. A new category id is checked before the write.
    pub fn update(&self, id: ItemId, changes: ItemChanges) -> StockbookResult<ItemWithCategory> {
        // A bad category id is reported before an unknown item id
        let new_category = match changes.category_id {
            Some(category_id) => {
                Some(IntegrityService::new(self.storage).require_category(category_id)?)
            }
            None => None,
        };

        let mut item = self
            .storage
            .items
            .get(id)?
            .ok_or_else(|| StockbookError::item_not_found(id.to_string()))?;
        let before = item.clone();

        if let Some(name) = changes.name {
            item.name = name.trim().to_string();
        }
        if let Some(category) = &new_category {
            item.category_id = category.id;
        }
        if let Some(quantity) = changes.quantity {
            item.quantity = quantity;
        }
        if let Some(price) = changes.price {
            item.price = price;
        }
        item.updated_at = Utc::now();

        item.validate()
            .map_err(|e| StockbookError::Validation(e.to_string()))?;

        // Re-check right before the write; the category may have gone meanwhile
        let category = IntegrityService::new(self.storage).require_category(item.category_id)?;

        self.storage.items.upsert(item.clone())?;
        self.storage.items.save()?;

        self.storage.log_update(
            EntityType::Item,
            item.id.to_string(),
            Some(item.name.clone()),
            &before,
            &item,
            None,
        );

        info!(id = %item.id, name = %item.name, "item updated");
        Ok(ItemWithCategory {
            item,
            category: Some(category),
        })
    }

    /// Delete an item
    pub fn delete(&self, id: ItemId) -> StockbookResult<Item> {
        let item = self
            .storage
            .items
            .delete(id)?
            .ok_or_else(|| StockbookError::item_not_found(id.to_string()))?;
        self.storage.items.save()?;

        self.storage.log_delete(
            EntityType::Item,
            item.id.to_string(),
            Some(item.name.clone()),
            &item,
        );

        info!(id = %item.id, name = %item.name, "item deleted");
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::StockbookPaths;
    use crate::services::{CategoryService, IntegrityService};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = StockbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn new_item(name: &str, category_id: CategoryId, quantity: u32) -> NewItem {
        NewItem {
            name: name.to_string(),
            category_id,
            quantity,
            price: Money::from_cents(1999),
        }
    }

    #[test]
    fn test_create_requires_live_category() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ItemService::new(&storage);

        let err = service
            .create(new_item("Laptop", CategoryId::new(), 15))
            .unwrap_err();
        assert_eq!(err.public_message().as_deref(), Some("Category not found"));
        assert_eq!(storage.items.count().unwrap(), 0);
    }

    #[test]
    fn test_create_after_category_deleted_fails() {
        let (_temp_dir, storage) = create_test_storage();
        let electronics = CategoryService::new(&storage).create("Electronics").unwrap();
        IntegrityService::new(&storage)
            .delete_category_cascade(electronics.id)
            .unwrap();

        let err = ItemService::new(&storage)
            .create(new_item("Laptop", electronics.id, 15))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_create_and_get() {
        let (_temp_dir, storage) = create_test_storage();
        let electronics = CategoryService::new(&storage).create("Electronics").unwrap();
        let service = ItemService::new(&storage);

        let created = service.create(new_item("Laptop", electronics.id, 15)).unwrap();
        assert_eq!(created.category_name(), "Electronics");

        let fetched = service.get(created.item.id).unwrap();
        assert_eq!(fetched.item.quantity, 15);
        assert!(service.get(ItemId::new()).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_search_and_category_filter() {
        let (_temp_dir, storage) = create_test_storage();
        let categories = CategoryService::new(&storage);
        let electronics = categories.create("Electronics").unwrap();
        let clothing = categories.create("Clothing").unwrap();
        let service = ItemService::new(&storage);

        service.create(new_item("Laptop", electronics.id, 15)).unwrap();
        service.create(new_item("Smartphone", electronics.id, 30)).unwrap();
        service.create(new_item("T-Shirt", clothing.id, 50)).unwrap();

        let search = ItemFilter {
            search: Some("PHONE".into()),
            ..Default::default()
        };
        let found = service.list(&search).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].item.name, "Smartphone");

        let by_category = ItemFilter {
            category_id: Some(clothing.id),
            ..Default::default()
        };
        let found = service.list(&by_category).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].category_name(), "Clothing");

        assert_eq!(service.list(&ItemFilter::default()).unwrap().len(), 3);
    }

    #[test]
    fn test_update_partial_and_repoint() {
        let (_temp_dir, storage) = create_test_storage();
        let categories = CategoryService::new(&storage);
        let electronics = categories.create("Electronics").unwrap();
        let tools = categories.create("Tools").unwrap();
        let service = ItemService::new(&storage);
        let laptop = service.create(new_item("Laptop", electronics.id, 15)).unwrap();

        let updated = service
            .update(
                laptop.item.id,
                ItemChanges {
                    quantity: Some(2),
                    category_id: Some(tools.id),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.item.name, "Laptop");
        assert_eq!(updated.item.quantity, 2);
        assert_eq!(updated.category_name(), "Tools");
        assert_eq!(storage.items.count_by_category(electronics.id).unwrap(), 0);
    }

    #[test]
    fn test_update_errors() {
        let (_temp_dir, storage) = create_test_storage();
        let electronics = CategoryService::new(&storage).create("Electronics").unwrap();
        let service = ItemService::new(&storage);
        let laptop = service.create(new_item("Laptop", electronics.id, 15)).unwrap();

        let err = service
            .update(
                laptop.item.id,
                ItemChanges {
                    category_id: Some(CategoryId::new()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert_eq!(err.public_message().as_deref(), Some("Category not found"));

        let err = service
            .update(ItemId::new(), ItemChanges::default())
            .unwrap_err();
        assert_eq!(err.public_message().as_deref(), Some("Item not found"));

        let err = service
            .update(
                laptop.item.id,
                ItemChanges {
                    price: Some(Money::from_cents(-1)),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.get(laptop.item.id).unwrap().item.price.cents(), 1999);
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, storage) = create_test_storage();
        let electronics = CategoryService::new(&storage).create("Electronics").unwrap();
        let service = ItemService::new(&storage);
        let laptop = service.create(new_item("Laptop", electronics.id, 15)).unwrap();

        service.delete(laptop.item.id).unwrap();
        assert!(service.delete(laptop.item.id).unwrap_err().is_not_found());
        assert_eq!(storage.items.count().unwrap(), 0);
    }
}
