//! Audit trail for Stockbook
//!
//! Every create, update and delete performed by the services is appended to
//! `audit.log` as one JSON line, with before/after snapshots of the record.
//! Updates carry a short field-level change summary built by [`summarize_changes`].

mod entry;
mod logger;

pub use entry::{summarize_changes, AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
