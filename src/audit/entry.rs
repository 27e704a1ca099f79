//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Types of records that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Category,
    Item,
    Transaction,
    Setting,
    User,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityType::Category => "Category",
            EntityType::Item => "Item",
            EntityType::Transaction => "Transaction",
            EntityType::Setting => "Setting",
            EntityType::User => "User",
        };
        f.write_str(name)
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    pub entity_id: String,

    /// Human-readable label of the record (category name, setting key, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    /// Snapshot before the operation (updates and deletes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,

    /// Snapshot after the operation (creates and updates)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn base(
        operation: Operation,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    /// Entry for a newly created record
    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            after: serde_json::to_value(entity).ok(),
            ..Self::base(Operation::Create, entity_type, entity_id, entity_name)
        }
    }

    /// Entry for a modified record. When no summary is given one is derived
    /// from the two snapshots.
    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Self {
        let before = serde_json::to_value(before).ok();
        let after = serde_json::to_value(after).ok();
        let diff_summary = diff_summary.or_else(|| match (&before, &after) {
            (Some(b), Some(a)) => summarize_changes(b, a),
            _ => None,
        });

        Self {
            before,
            after,
            diff_summary,
            ..Self::base(Operation::Update, entity_type, entity_id, entity_name)
        }
    }

    /// Entry for a removed record
    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            before: serde_json::to_value(entity).ok(),
            ..Self::base(Operation::Delete, entity_type, entity_id, entity_name)
        }
    }

    /// One-line rendering, with the change summary on a second line
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

/// Top-level field changes between two snapshots, `None` when nothing changed.
///
/// Timestamps are skipped since every write bumps `updated_at`.
pub fn summarize_changes(before: &Value, after: &Value) -> Option<String> {
    let (Value::Object(before), Value::Object(after)) = (before, after) else {
        return (before != after).then(|| format!("{} -> {}", before, after));
    };

    let changes: Vec<String> = after
        .iter()
        .filter(|(key, _)| key.as_str() != "updated_at")
        .filter_map(|(key, new)| match before.get(key) {
            Some(old) if old == new => None,
            Some(old) => Some(format!("{}: {} -> {}", key, old, new)),
            None => Some(format!("{}: (added) -> {}", key, new)),
        })
        .chain(
            before
                .keys()
                .filter(|key| !after.contains_key(*key))
                .map(|key| format!("{}: (removed)", key)),
        )
        .collect();

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display() {
        assert_eq!(Operation::Delete.to_string(), "DELETE");
        assert_eq!(EntityType::Item.to_string(), "Item");
    }

    #[test]
    fn test_update_derives_summary() {
        let before = json!({"name": "Hammer", "quantity": 3, "updated_at": "a"});
        let after = json!({"name": "Hammer", "quantity": 12, "updated_at": "b"});

        let entry = AuditEntry::update(
            EntityType::Item,
            "itm-12345678",
            Some("Hammer".into()),
            &before,
            &after,
            None,
        );

        assert_eq!(entry.diff_summary.as_deref(), Some("quantity: 3 -> 12"));
    }

    #[test]
    fn test_summary_added_and_removed_fields() {
        let before = json!({"name": "Books", "legacy": true});
        let after = json!({"name": "Books", "description": "x"});

        let summary = summarize_changes(&before, &after).unwrap();
        assert!(summary.contains("description: (added) -> \"x\""));
        assert!(summary.contains("legacy: (removed)"));
        assert!(summarize_changes(&after, &after).is_none());
    }

    #[test]
    fn test_create_and_delete_snapshots() {
        let record = json!({"name": "Tools"});
        let created = AuditEntry::create(EntityType::Category, "cat-1", None, &record);
        assert!(created.before.is_none());
        assert_eq!(created.after, Some(record.clone()));

        let deleted = AuditEntry::delete(EntityType::Category, "cat-1", None, &record);
        assert_eq!(deleted.before, Some(record));
        assert!(deleted.after.is_none());
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::create(
            EntityType::Setting,
            "set-12345678",
            Some("financial_tracking".into()),
            &json!({}),
        );
        let formatted = entry.format_human_readable();
        assert!(formatted.contains("CREATE Setting set-12345678 (financial_tracking)"));
    }
}
