//! Configuration module for Stockbook
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Application settings persistence

pub mod paths;
pub mod settings;

pub use paths::StockbookPaths;
pub use settings::AppSettings;
