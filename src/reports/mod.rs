//! Reports for Stockbook
//!
//! Read-only analytics computed from current store state.

pub mod dashboard;

pub use dashboard::{DashboardReport, FinancialSummary, RECENT_TRANSACTION_LIMIT};
