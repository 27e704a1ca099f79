//! Profile service
//!
//! The only operation that consults the authentication collaborator.

use chrono::Utc;
use tracing::info;

use crate::audit::EntityType;
use crate::auth::Principal;
use crate::error::{StockbookError, StockbookResult};
use crate::models::User;
use crate::storage::Storage;

pub struct ProfileService<'a> {
    storage: &'a Storage,
}

impl<'a> ProfileService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Set the display name of the signed-in user
    pub fn update_profile(
        &self,
        principal: Option<&Principal>,
        name: &str,
    ) -> StockbookResult<User> {
        let principal = principal.ok_or(StockbookError::Unauthorized)?;

        let name = name.trim();
        if name.is_empty() {
            return Err(StockbookError::Validation("Name is required".into()));
        }

        let mut user = self
            .storage
            .users
            .get_by_email(&principal.email)?
            .ok_or_else(|| StockbookError::user_not_found(principal.email.clone()))?;
        let before = user.clone();

        user.name = Some(name.to_string());
        user.updated_at = Utc::now();
        self.storage.users.upsert(user.clone())?;
        self.storage.users.save()?;

        self.storage.log_update(
            EntityType::User,
            user.id.to_string(),
            Some(user.email.clone()),
            &before,
            &user,
            None,
        );

        info!(user = %user.id, "profile updated");
        Ok(user)
    }
}
