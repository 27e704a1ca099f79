//! Route handlers
//!
//! One function per route. Payloads arrive as JSON values and query strings
//! as string maps; both go through [`crate::validation`] before any service
//! is called.

use std::collections::HashMap;
use std::str::FromStr;

use serde_json::{json, Value};

use super::dto::{CategoryDto, DashboardDto, ItemDto, SettingDto, TransactionDto, UserDto};
use super::ApiResponse;
use crate::auth::SessionProvider;
use crate::error::{StockbookError, StockbookResult};
use crate::export::export_data;
use crate::models::{CategoryId, ItemId, TransactionId};
use crate::reports::DashboardReport;
use crate::services::{
    CategoryService, IntegrityService, ItemChanges, ItemFilter, ItemService, NewItem,
    NewTransaction, ProfileService, SettingsService, TransactionFilter, TransactionService,
};
use crate::storage::Storage;
use crate::validation::{
    validate, validate_query, CategoryPayload, ExportQuery, ProfilePayload, SettingPayload,
};

/// Query-string parameters
pub type Query = HashMap<String, String>;

fn respond(operation: &str, handler: impl FnOnce() -> StockbookResult<ApiResponse>) -> ApiResponse {
    handler().unwrap_or_else(|err| ApiResponse::from_error(operation, err))
}

/// A path id that does not parse cannot name a record
fn path_id<T: FromStr>(
    raw: &str,
    not_found: fn(String) -> StockbookError,
) -> StockbookResult<T> {
    raw.parse().map_err(|_| not_found(raw.to_string()))
}

// Categories

/// `GET /categories`
pub fn list_categories(storage: &Storage) -> ApiResponse {
    respond("fetch categories", || {
        let categories: Vec<CategoryDto> = CategoryService::new(storage)
            .list()?
            .into_iter()
            .map(CategoryDto::from)
            .collect();
        Ok(ApiResponse::ok(categories))
    })
}

/// `POST /categories`
pub fn create_category(storage: &Storage, payload: &Value) -> ApiResponse {
    respond("create category", || {
        let payload: CategoryPayload = validate(payload)?;
        let service = CategoryService::new(storage);
        let category = service.create(&payload.name)?;
        Ok(ApiResponse::created(CategoryDto::from(service.get(category.id)?)))
    })
}

/// `GET /categories/{id}`
pub fn get_category(storage: &Storage, id: &str) -> ApiResponse {
    respond("fetch category", || {
        let id: CategoryId = path_id(id, StockbookError::category_not_found)?;
        Ok(ApiResponse::ok(CategoryDto::from(
            CategoryService::new(storage).get(id)?,
        )))
    })
}

/// `PUT /categories/{id}`
pub fn update_category(storage: &Storage, id: &str, payload: &Value) -> ApiResponse {
    respond("update category", || {
        let payload: CategoryPayload = validate(payload)?;
        let id: CategoryId = path_id(id, StockbookError::category_not_found)?;
        let service = CategoryService::new(storage);
        service.update(id, &payload.name)?;
        Ok(ApiResponse::ok(CategoryDto::from(service.get(id)?)))
    })
}

/// `DELETE /categories/{id}`, removing the category's items with it
pub fn delete_category(storage: &Storage, id: &str) -> ApiResponse {
    respond("delete category", || {
        let id: CategoryId = path_id(id, StockbookError::category_not_found)?;
        let outcome = IntegrityService::new(storage).delete_category_cascade(id)?;
        Ok(ApiResponse::message(format!(
            "Category deleted. {} items were also deleted.",
            outcome.deleted_items
        )))
    })
}

// Items

/// `GET /items?search=&categoryId=`
pub fn list_items(storage: &Storage, query: &Query) -> ApiResponse {
    respond("fetch items", || {
        let filter: ItemFilter = validate_query(query)?;
        let items: Vec<ItemDto> = ItemService::new(storage)
            .list(&filter)?
            .into_iter()
            .map(ItemDto::from)
            .collect();
        Ok(ApiResponse::ok(items))
    })
}

/// `POST /items`
pub fn create_item(storage: &Storage, payload: &Value) -> ApiResponse {
    respond("create item", || {
        let input: NewItem = validate(payload)?;
        let item = ItemService::new(storage).create(input)?;
        Ok(ApiResponse::created(ItemDto::from(item)))
    })
}

/// `GET /items/{id}`
pub fn get_item(storage: &Storage, id: &str) -> ApiResponse {
    respond("fetch item", || {
        let id: ItemId = path_id(id, StockbookError::item_not_found)?;
        Ok(ApiResponse::ok(ItemDto::from(ItemService::new(storage).get(id)?)))
    })
}

/// `PUT /items/{id}` with any subset of `{name, categoryId, quantity, price}`
pub fn update_item(storage: &Storage, id: &str, payload: &Value) -> ApiResponse {
    respond("update item", || {
        let changes: ItemChanges = validate(payload)?;
        let id: ItemId = path_id(id, StockbookError::item_not_found)?;
        let item = ItemService::new(storage).update(id, changes)?;
        Ok(ApiResponse::ok(ItemDto::from(item)))
    })
}

/// `DELETE /items/{id}`
pub fn delete_item(storage: &Storage, id: &str) -> ApiResponse {
    respond("delete item", || {
        let id: ItemId = path_id(id, StockbookError::item_not_found)?;
        ItemService::new(storage).delete(id)?;
        Ok(ApiResponse::message("Item deleted"))
    })
}

// Transactions

/// `GET /transactions?type=&limit=`
pub fn list_transactions(storage: &Storage, query: &Query) -> ApiResponse {
    respond("fetch transactions", || {
        let filter: TransactionFilter = validate_query(query)?;
        let transactions: Vec<TransactionDto> = TransactionService::new(storage)
            .list(&filter)?
            .into_iter()
            .map(TransactionDto::from)
            .collect();
        Ok(ApiResponse::ok(transactions))
    })
}

/// `POST /transactions`. The gate is checked before the payload is looked at.
pub fn create_transaction(storage: &Storage, payload: &Value) -> ApiResponse {
    respond("create transaction", || {
        SettingsService::new(storage).ensure_financial_enabled()?;
        let input: NewTransaction = validate(payload)?;
        let txn = TransactionService::new(storage).create(input)?;
        Ok(ApiResponse::created(TransactionDto::from(txn)))
    })
}

/// `DELETE /transactions/{id}`
pub fn delete_transaction(storage: &Storage, id: &str) -> ApiResponse {
    respond("delete transaction", || {
        let id: TransactionId = path_id(id, StockbookError::transaction_not_found)?;
        TransactionService::new(storage).delete(id)?;
        Ok(ApiResponse::message("Transaction deleted"))
    })
}

// Settings

/// `GET /settings`
pub fn list_settings(storage: &Storage) -> ApiResponse {
    respond("fetch settings", || {
        let settings: Vec<SettingDto> = SettingsService::new(storage)
            .list()?
            .into_iter()
            .map(SettingDto::from)
            .collect();
        Ok(ApiResponse::ok(settings))
    })
}

/// `POST /settings`, creating or replacing the record for `key`
pub fn upsert_setting(storage: &Storage, payload: &Value) -> ApiResponse {
    respond("update settings", || {
        let payload: SettingPayload = validate(payload)?;
        let setting = SettingsService::new(storage).upsert(
            &payload.key,
            payload.value,
            payload.financial_tracking_enabled,
        )?;
        Ok(ApiResponse::ok(SettingDto::from(setting)))
    })
}

// Reports

/// `GET /dashboard`
pub fn dashboard(storage: &Storage) -> ApiResponse {
    respond("fetch dashboard data", || {
        let report = DashboardReport::generate(storage)?;
        Ok(ApiResponse::ok(DashboardDto::from(report)))
    })
}

/// `GET /export?format=&type=`
pub fn export(storage: &Storage, query: &Query) -> ApiResponse {
    respond("export data", || {
        let query: ExportQuery = validate_query(query)?;
        let output = export_data(storage, query.format, query.scope)?;
        Ok(ApiResponse::attachment(output))
    })
}

// Profile

/// `PUT /user/profile`
pub fn update_profile(
    storage: &Storage,
    session: &dyn SessionProvider,
    payload: &Value,
) -> ApiResponse {
    respond("update profile", || {
        let principal = session
            .current_principal()
            .ok_or(StockbookError::Unauthorized)?;
        let payload: ProfilePayload = validate(payload)?;
        let user = ProfileService::new(storage).update_profile(Some(&principal), &payload.name)?;
        Ok(ApiResponse::json(
            200,
            json!({
                "success": true,
                "message": "Profile updated successfully",
                "user": UserDto::from(user),
            }),
        ))
    })
}
