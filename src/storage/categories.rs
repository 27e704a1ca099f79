//! Category repository for JSON storage
//!
//! Manages loading and saving categories to categories.json. The repository
//! owns the name uniqueness constraint: `insert` and `update` refuse a name
//! already held by another record.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::StockbookError;
use crate::models::{Category, CategoryId};

use super::file_io::{lock_error, read_json, write_json_atomic};

/// Serializable category data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CategoryData {
    pub categories: Vec<Category>,
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: PathBuf,
    categories: RwLock<HashMap<CategoryId, Category>>,
}

impl CategoryRepository {
    /// Create a new category repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            categories: RwLock::new(HashMap::new()),
        }
    }

    /// Load categories from disk
    pub fn load(&self) -> Result<(), StockbookError> {
        let file_data: CategoryData = read_json(&self.path)?;

        let mut categories = self.categories.write().map_err(lock_error)?;
        categories.clear();
        for category in file_data.categories {
            categories.insert(category.id, category);
        }

        Ok(())
    }

    /// Save categories to disk
    pub fn save(&self) -> Result<(), StockbookError> {
        let file_data = CategoryData {
            categories: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a category by ID
    pub fn get(&self, id: CategoryId) -> Result<Option<Category>, StockbookError> {
        let categories = self.categories.read().map_err(lock_error)?;
        Ok(categories.get(&id).cloned())
    }

    /// Whether a category with this ID exists
    pub fn exists(&self, id: CategoryId) -> Result<bool, StockbookError> {
        let categories = self.categories.read().map_err(lock_error)?;
        Ok(categories.contains_key(&id))
    }

    /// Get all categories, sorted by name
    pub fn get_all(&self) -> Result<Vec<Category>, StockbookError> {
        let categories = self.categories.read().map_err(lock_error)?;

        let mut list: Vec<_> = categories.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }

    /// Get a category by exact name
    pub fn get_by_name(&self, name: &str) -> Result<Option<Category>, StockbookError> {
        let categories = self.categories.read().map_err(lock_error)?;
        Ok(categories.values().find(|c| c.name == name).cloned())
    }

    /// Insert a new category, enforcing name uniqueness
    pub fn insert(&self, category: Category) -> Result<(), StockbookError> {
        let mut categories = self.categories.write().map_err(lock_error)?;

        if categories.values().any(|c| c.name == category.name) {
            return Err(StockbookError::Duplicate {
                entity_type: "Category",
                identifier: category.name,
            });
        }

        categories.insert(category.id, category);
        Ok(())
    }

    /// Replace an existing category, enforcing name uniqueness against the others
    pub fn update(&self, category: Category) -> Result<(), StockbookError> {
        let mut categories = self.categories.write().map_err(lock_error)?;

        if !categories.contains_key(&category.id) {
            return Err(StockbookError::category_not_found(category.id.to_string()));
        }

        if categories
            .values()
            .any(|c| c.id != category.id && c.name == category.name)
        {
            return Err(StockbookError::Duplicate {
                entity_type: "Category",
                identifier: category.name,
            });
        }

        categories.insert(category.id, category);
        Ok(())
    }

    /// Delete a category, returning whether it existed
    pub fn delete(&self, id: CategoryId) -> Result<bool, StockbookError> {
        let mut categories = self.categories.write().map_err(lock_error)?;
        Ok(categories.remove(&id).is_some())
    }

    /// Remove every record (used by sample-data seeding)
    pub fn clear(&self) -> Result<(), StockbookError> {
        self.categories.write().map_err(lock_error)?.clear();
        Ok(())
    }

    /// Count categories
    pub fn count(&self) -> Result<usize, StockbookError> {
        let categories = self.categories.read().map_err(lock_error)?;
        Ok(categories.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, CategoryRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("categories.json");
        let repo = CategoryRepository::new(path);
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_insert_rejects_duplicate_name() {
        let (_temp_dir, repo) = create_test_repo();
        repo.insert(Category::new("Tools")).unwrap();

        let result = repo.insert(Category::new("Tools"));
        assert!(matches!(result, Err(StockbookError::Duplicate { .. })));
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_name_match_is_exact() {
        let (_temp_dir, repo) = create_test_repo();
        repo.insert(Category::new("Books")).unwrap();

        assert!(repo.get_by_name("books").unwrap().is_none());
        assert!(repo.insert(Category::new("books")).is_ok());
    }

    #[test]
    fn test_update_allows_own_name_but_not_others() {
        let (_temp_dir, repo) = create_test_repo();
        let mut tools = Category::new("Tools");
        repo.insert(tools.clone()).unwrap();
        repo.insert(Category::new("Books")).unwrap();

        tools.rename("Tools");
        assert!(repo.update(tools.clone()).is_ok());

        tools.rename("Books");
        assert!(matches!(
            repo.update(tools),
            Err(StockbookError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let (_temp_dir, repo) = create_test_repo();
        let err = repo.update(Category::new("Ghost")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_save_and_reload_sorted_by_name() {
        let (temp_dir, repo) = create_test_repo();
        repo.insert(Category::new("Tools")).unwrap();
        repo.insert(Category::new("Books")).unwrap();
        repo.insert(Category::new("Electronics")).unwrap();
        repo.save().unwrap();

        let repo2 = CategoryRepository::new(temp_dir.path().join("categories.json"));
        repo2.load().unwrap();

        let names: Vec<_> = repo2.get_all().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Books", "Electronics", "Tools"]);
    }
}
