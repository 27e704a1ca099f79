//! User repository for JSON storage

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::StockbookError;
use crate::models::{User, UserId};

use super::file_io::{lock_error, read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct UserData {
    users: Vec<User>,
}

/// Repository for user persistence
pub struct UserRepository {
    path: PathBuf,
    data: RwLock<HashMap<UserId, User>>,
}

impl UserRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), StockbookError> {
        let file_data: UserData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        data.clear();
        for user in file_data.users {
            data.insert(user.id, user);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), StockbookError> {
        let data = self.data.read().map_err(lock_error)?;
        let mut users: Vec<_> = data.values().cloned().collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        write_json_atomic(&self.path, &UserData { users })
    }

    pub fn get(&self, id: UserId) -> Result<Option<User>, StockbookError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// Get a user by email (exact match)
    pub fn get_by_email(&self, email: &str) -> Result<Option<User>, StockbookError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.values().find(|u| u.email == email).cloned())
    }

    /// Insert or replace a user, enforcing email uniqueness
    pub fn upsert(&self, user: User) -> Result<(), StockbookError> {
        let mut data = self.data.write().map_err(lock_error)?;

        if data
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(StockbookError::Duplicate {
                entity_type: "User",
                identifier: user.email,
            });
        }

        data.insert(user.id, user);
        Ok(())
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
    use crate::models::UserRole;
    use tempfile::TempDir;

    #[test]
    fn test_email_is_unique() {
        let temp_dir = TempDir::new().unwrap();
        let repo = UserRepository::new(temp_dir.path().join("users.json"));

        repo.upsert(User::new("admin@inventory.com", UserRole::Admin))
            .unwrap();
        let result = repo.upsert(User::new("admin@inventory.com", UserRole::User));
        assert!(matches!(result, Err(StockbookError::Duplicate { .. })));
    }

    #[test]
    fn test_save_and_find_by_email() {
        let temp_dir = TempDir::new().unwrap();
        let repo = UserRepository::new(temp_dir.path().join("users.json"));
        let user = User::new("owner@shop.test", UserRole::User).with_name("Owner");
        repo.upsert(user.clone()).unwrap();
        repo.save().unwrap();

        let repo2 = UserRepository::new(temp_dir.path().join("users.json"));
        repo2.load().unwrap();
        let found = repo2.get_by_email("owner@shop.test").unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.name.as_deref(), Some("Owner"));
    }
}
