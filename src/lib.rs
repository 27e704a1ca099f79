//! Stockbook - inventory and bookkeeping for small businesses
//!
//! This library provides the domain layer behind the `stockbook` binary:
//! categories of inventory items, income and expense transactions, a
//! runtime switch that gates financial bookkeeping, and the dashboard and
//! export views computed from them.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (categories, items, transactions, settings, users)
//! - `storage`: JSON file storage layer
//! - `audit`: Audit logging system
//! - `services`: Business rules, including the category cascade and the financial gate
//! - `reports`: Dashboard analytics
//! - `export`: CSV and JSON exports
//! - `validation`: Request payload schemas
//! - `auth`: The current-principal collaborator
//! - `api`: Route functions returning status + envelope
//! - `cli`, `display`: Command-line front end
//!
//! # Example
//!
//! ```rust,ignore
//! use stockbook::config::paths::StockbookPaths;
//! use stockbook::storage::Storage;
//!
//! let mut storage = Storage::new(StockbookPaths::new()?)?;
//! storage.load_all()?;
//! let response = stockbook::api::dashboard(&storage);
//! ```

pub mod api;
pub mod audit;
pub mod auth;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;
pub mod validation;

pub use error::{StockbookError, StockbookResult};
