//! Service layer for Stockbook
//!
//! Business rules on top of the storage layer: validation, the financial
//! gate, referential integrity and cross-entity operations.

pub mod category;
pub mod integrity;
pub mod item;
pub mod profile;
pub mod settings;
pub mod transaction;

pub use category::{CategoryService, CategoryWithCount};
pub use integrity::{CascadeOutcome, IntegrityService};
pub use item::{ItemChanges, ItemFilter, ItemService, ItemWithCategory, NewItem};
pub use profile::ProfileService;
pub use settings::SettingsService;
pub use transaction::{
    NewTransaction, TransactionFilter, TransactionService, DEFAULT_TRANSACTION_LIMIT,
};
