//! Storage initialization and sample data
//!
//! `initialize_storage` handles first-run setup. `seed_sample_data` replaces
//! the whole store with a small demo shop: five categories, ten items, five
//! transactions, the two well-known settings and an admin user.

use chrono::{Duration, Utc};
use serde_json::json;

use crate::config::paths::StockbookPaths;
use crate::config::settings::AppSettings;
use crate::error::StockbookResult;
use crate::models::{
    Category, Item, Money, Transaction, TransactionKind, User, UserRole, FINANCIAL_TRACKING_KEY,
    LOW_STOCK_THRESHOLD_KEY,
};

use super::Storage;

/// Email of the seeded administrator
pub const SEED_ADMIN_EMAIL: &str = "admin@inventory.com";

const SEED_CATEGORIES: [&str; 5] = ["Electronics", "Clothing", "Food & Beverages", "Books", "Tools"];

/// (name, category index, quantity, price in cents)
const SEED_ITEMS: [(&str, usize, u32, i64); 10] = [
    ("Laptop", 0, 15, 99999),
    ("Smartphone", 0, 30, 69999),
    ("T-Shirt", 1, 50, 1999),
    ("Jeans", 1, 25, 4999),
    ("Coffee Beans", 2, 100, 1299),
    ("Water Bottle", 2, 5, 499),
    ("Programming Book", 3, 20, 3999),
    ("Hammer", 4, 3, 2499),
    ("Screwdriver Set", 4, 8, 2999),
    ("Tablet", 0, 12, 39999),
];

const SEED_TRANSACTIONS: [(TransactionKind, i64, &str); 5] = [
    (TransactionKind::Income, 99999, "Sold 1 Laptop"),
    (TransactionKind::Income, 69999, "Sold 1 Smartphone"),
    (TransactionKind::Expense, 50000, "Restocked Electronics"),
    (TransactionKind::Income, 4999, "Sold 1 Jeans"),
    (TransactionKind::Expense, 20000, "Monthly Utilities"),
];

/// Counts of what `seed_sample_data` wrote
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSummary {
    pub categories: usize,
    pub items: usize,
    pub transactions: usize,
    pub settings: usize,
    pub users: usize,
}

/// Initialize storage for a fresh installation
///
/// Creates the directory layout and a default `config.json`. No setting
/// records are written: their absence already means the defaults.
pub fn initialize_storage(paths: &StockbookPaths) -> StockbookResult<AppSettings> {
    paths.ensure_directories()?;
    let settings = AppSettings::load_or_create(paths)?;
    if !paths.settings_file().exists() {
        settings.save(paths)?;
    }
    Ok(settings)
}

/// Replace everything in the store with the demo data set and save it
pub fn seed_sample_data(storage: &Storage) -> StockbookResult<SeedSummary> {
    storage.categories.clear()?;
    storage.items.clear()?;
    storage.transactions.clear()?;
    storage.settings.clear()?;
    storage.users.clear()?;

    let categories: Vec<Category> = SEED_CATEGORIES.iter().map(|name| Category::new(*name)).collect();
    for category in &categories {
        storage.categories.insert(category.clone())?;
    }

    // Stagger creation times so "newest first" follows declaration order in reverse
    let start = Utc::now() - Duration::minutes(30);
    for (offset, (name, category, quantity, cents)) in SEED_ITEMS.iter().enumerate() {
        let mut item = Item::new(
            *name,
            categories[*category].id,
            *quantity,
            Money::from_cents(*cents),
        );
        item.created_at = start + Duration::seconds(offset as i64);
        item.updated_at = item.created_at;
        storage.items.upsert(item)?;
    }

    for (offset, (kind, cents, description)) in SEED_TRANSACTIONS.iter().enumerate() {
        let mut txn = Transaction::new(*kind, Money::from_cents(*cents)).with_description(*description);
        txn.created_at = start + Duration::minutes(1) + Duration::seconds(offset as i64);
        txn.updated_at = txn.created_at;
        storage.transactions.insert(txn)?;
    }

    storage
        .settings
        .upsert(FINANCIAL_TRACKING_KEY, json!({ "enabled": true }), Some(true))?;
    storage
        .settings
        .upsert(LOW_STOCK_THRESHOLD_KEY, json!({ "threshold": 10 }), Some(true))?;

    storage
        .users
        .upsert(User::new(SEED_ADMIN_EMAIL, UserRole::Admin).with_name("Admin User"))?;

    storage.save_all()?;

    Ok(SeedSummary {
        categories: storage.categories.count()?,
        items: storage.items.count()?,
        transactions: storage.transactions.count()?,
        settings: storage.settings.count()?,
        users: storage.users.count()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = StockbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_initialize_storage_writes_config() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StockbookPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(!paths.is_initialized());
        let settings = initialize_storage(&paths).unwrap();

        assert!(paths.is_initialized());
        assert!(paths.data_dir().exists());
        assert!(settings.audit_enabled);
    }

    #[test]
    fn test_seed_counts() {
        let (_temp_dir, storage) = create_test_storage();
        let summary = seed_sample_data(&storage).unwrap();

        assert_eq!(
            summary,
            SeedSummary {
                categories: 5,
                items: 10,
                transactions: 5,
                settings: 2,
                users: 1,
            }
        );
    }

    #[test]
    fn test_seed_replaces_existing_data() {
        let (_temp_dir, storage) = create_test_storage();
        storage.categories.insert(Category::new("Garden")).unwrap();

        seed_sample_data(&storage).unwrap();
        seed_sample_data(&storage).unwrap();

        assert!(storage.categories.get_by_name("Garden").unwrap().is_none());
        assert_eq!(storage.categories.count().unwrap(), 5);
        assert_eq!(storage.items.count().unwrap(), 10);
    }

    #[test]
    fn test_seed_item_order_newest_first() {
        let (_temp_dir, storage) = create_test_storage();
        seed_sample_data(&storage).unwrap();

        let items = storage.items.get_all().unwrap();
        assert_eq!(items[0].name, "Tablet");
        assert_eq!(items[9].name, "Laptop");

        let recent = storage.transactions.get_recent(1).unwrap();
        assert_eq!(recent[0].description.as_deref(), Some("Monthly Utilities"));
    }
}
