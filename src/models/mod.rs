//! Core data models for Stockbook
//!
//! This module contains the persisted records of the inventory domain:
//! categories, items, transactions, settings and users.

pub mod category;
pub mod ids;
pub mod item;
pub mod money;
pub mod setting;
pub mod transaction;
pub mod user;

pub use category::Category;
pub use ids::{CategoryId, ItemId, SettingId, TransactionId, UserId};
pub use item::Item;
pub use money::{Money, MoneyParseError};
pub use setting::{
    InventoryConfig, Setting, DEFAULT_LOW_STOCK_THRESHOLD, FINANCIAL_TRACKING_KEY,
    LOW_STOCK_THRESHOLD_KEY,
};
pub use transaction::{Transaction, TransactionKind};
pub use user::{User, UserRole};
