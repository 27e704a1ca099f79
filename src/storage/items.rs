//! Item repository for JSON storage
//!
//! Manages loading and saving inventory items to items.json, with an index
//! from category to item ids for the cascade and per-category counts.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::StockbookError;
use crate::models::{CategoryId, Item, ItemId};

use super::file_io::{lock_error, read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ItemData {
    items: Vec<Item>,
}

/// Repository for item persistence with a category index
pub struct ItemRepository {
    path: PathBuf,
    data: RwLock<HashMap<ItemId, Item>>,
    /// Index: category_id -> item_ids
    by_category: RwLock<HashMap<CategoryId, Vec<ItemId>>>,
}

/// Newest first, ties broken by id so ordering is stable
fn newest_first(items: &mut [Item]) {
    items.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
    });
}

impl ItemRepository {
    /// Create a new item repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_category: RwLock::new(HashMap::new()),
        }
    }

    /// Load items from disk and build the category index
    pub fn load(&self) -> Result<(), StockbookError> {
        let file_data: ItemData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_category = self.by_category.write().map_err(lock_error)?;

        data.clear();
        by_category.clear();

        for item in file_data.items {
            by_category.entry(item.category_id).or_default().push(item.id);
            data.insert(item.id, item);
        }

        Ok(())
    }

    /// Save items to disk
    pub fn save(&self) -> Result<(), StockbookError> {
        let file_data = ItemData {
            items: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get an item by ID
    pub fn get(&self, id: ItemId) -> Result<Option<Item>, StockbookError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// Get all items, newest first
    pub fn get_all(&self) -> Result<Vec<Item>, StockbookError> {
        let data = self.data.read().map_err(lock_error)?;
        let mut items: Vec<_> = data.values().cloned().collect();
        newest_first(&mut items);
        Ok(items)
    }

    /// Get items in a category, newest first
    pub fn get_by_category(&self, category_id: CategoryId) -> Result<Vec<Item>, StockbookError> {
        let data = self.data.read().map_err(lock_error)?;
        let by_category = self.by_category.read().map_err(lock_error)?;

        let ids = by_category
            .get(&category_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[]);
        let mut items: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        newest_first(&mut items);
        Ok(items)
    }

    /// Remove every record (used by sample-data seeding)
    pub fn clear(&self) -> Result<(), StockbookError> {
        self.data.write().map_err(lock_error)?.clear();
        self.by_category.write().map_err(lock_error)?.clear();
        Ok(())
    }

    /// Count items referencing a category
    pub fn count_by_category(&self, category_id: CategoryId) -> Result<usize, StockbookError> {
        let by_category = self.by_category.read().map_err(lock_error)?;
        Ok(by_category.get(&category_id).map(Vec::len).unwrap_or(0))
    }

    /// Insert or replace an item, keeping the category index in step
    pub fn upsert(&self, item: Item) -> Result<(), StockbookError> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_category = self.by_category.write().map_err(lock_error)?;

        if let Some(previous) = data.get(&item.id) {
            if previous.category_id != item.category_id {
                if let Some(ids) = by_category.get_mut(&previous.category_id) {
                    ids.retain(|id| *id != item.id);
                }
                by_category.entry(item.category_id).or_default().push(item.id);
            }
        } else {
            by_category.entry(item.category_id).or_default().push(item.id);
        }

        data.insert(item.id, item);
        Ok(())
    }

    /// Delete an item, returning the removed record
    pub fn delete(&self, id: ItemId) -> Result<Option<Item>, StockbookError> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_category = self.by_category.write().map_err(lock_error)?;

        let removed = data.remove(&id);
        if let Some(item) = &removed {
            if let Some(ids) = by_category.get_mut(&item.category_id) {
                ids.retain(|other| *other != id);
            }
        }
        Ok(removed)
    }

    /// Delete every item referencing a category, returning how many were removed
    pub fn delete_by_category(&self, category_id: CategoryId) -> Result<usize, StockbookError> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_category = self.by_category.write().map_err(lock_error)?;

        let ids = by_category.remove(&category_id).unwrap_or_default();
        let removed = ids.iter().filter(|id| data.remove(id).is_some()).count();
        Ok(removed)
    }

    /// Count items
    pub fn count(&self) -> Result<usize, StockbookError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.len())
    }
}
