//! Caller-facing output shapes, one per operation
//!
//! Records are stored in their own (snake_case, cents) form; these types are
//! what leaves the boundary: camelCase keys, full ids, decimal amounts.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::models::money::serialize_decimal;
use crate::models::{
    Category, CategoryId, ItemId, Money, Setting, SettingId, Transaction, TransactionId,
    TransactionKind, User, UserId,
};
use crate::reports::dashboard::{DashboardReport, FinancialSummary};
use crate::services::{CategoryWithCount, ItemWithCategory};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemCount {
    pub items: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: CategoryId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "_count")]
    pub count: ItemCount,
}

impl From<CategoryWithCount> for CategoryDto {
    fn from(entry: CategoryWithCount) -> Self {
        Self {
            id: entry.category.id,
            name: entry.category.name,
            created_at: entry.category.created_at,
            updated_at: entry.category.updated_at,
            count: ItemCount {
                items: entry.item_count,
            },
        }
    }
}

/// `{id, name}` of the category an item belongs to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRef {
    pub id: CategoryId,
    pub name: String,
}

impl From<&Category> for CategoryRef {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDto {
    pub id: ItemId,
    pub name: String,
    pub category_id: CategoryId,
    pub category: Option<CategoryRef>,
    pub quantity: u32,
    #[serde(serialize_with = "serialize_decimal")]
    pub price: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ItemWithCategory> for ItemDto {
    fn from(entry: ItemWithCategory) -> Self {
        Self {
            category: entry.category.as_ref().map(CategoryRef::from),
            id: entry.item.id,
            name: entry.item.name,
            category_id: entry.item.category_id,
            quantity: entry.item.quantity,
            price: entry.item.price,
            created_at: entry.item.created_at,
            updated_at: entry.item.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(serialize_with = "serialize_decimal")]
    pub amount: Money,
    pub description: Option<String>,
    pub item_id: Option<ItemId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionDto {
    fn from(txn: Transaction) -> Self {
        Self {
            id: txn.id,
            kind: txn.kind,
            amount: txn.amount,
            description: txn.description,
            item_id: txn.item_id,
            created_at: txn.created_at,
            updated_at: txn.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingDto {
    pub id: SettingId,
    pub key: String,
    /// Payload with JSON-encoded strings decoded
    pub value: Value,
    pub financial_tracking_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Setting> for SettingDto {
    fn from(setting: Setting) -> Self {
        Self {
            value: setting.decoded_value(),
            id: setting.id,
            key: setting.key,
            financial_tracking_enabled: setting.financial_tracking_enabled,
            created_at: setting.created_at,
            updated_at: setting.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: UserId,
    pub name: Option<String>,
    pub email: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockItemDto {
    pub id: ItemId,
    pub name: String,
    pub category_id: CategoryId,
    pub category: Option<CategoryRef>,
    pub quantity: u32,
    #[serde(serialize_with = "serialize_decimal")]
    pub price: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialDto {
    pub enabled: bool,
    #[serde(serialize_with = "serialize_decimal")]
    pub total_income: Money,
    #[serde(serialize_with = "serialize_decimal")]
    pub total_expenses: Money,
    #[serde(serialize_with = "serialize_decimal")]
    pub net_profit: Money,
}

impl From<FinancialSummary> for FinancialDto {
    fn from(summary: FinancialSummary) -> Self {
        Self {
            enabled: summary.enabled,
            total_income: summary.total_income,
            total_expenses: summary.total_expenses,
            net_profit: summary.net_profit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDistributionDto {
    pub id: CategoryId,
    pub name: String,
    #[serde(rename = "_count")]
    pub count: ItemCount,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentTransactionDto {
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(serialize_with = "serialize_decimal")]
    pub amount: Money,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDto {
    pub total_items: usize,
    pub total_categories: usize,
    pub low_stock_items: Vec<LowStockItemDto>,
    pub financial: FinancialDto,
    pub categories: Vec<CategoryDistributionDto>,
    pub recent_transactions: Vec<RecentTransactionDto>,
}

impl From<DashboardReport> for DashboardDto {
    fn from(report: DashboardReport) -> Self {
        Self {
            total_items: report.total_items,
            total_categories: report.total_categories,
            low_stock_items: report
                .low_stock_items
                .into_iter()
                .map(|entry| LowStockItemDto {
                    category: entry.category.as_ref().map(CategoryRef::from),
                    id: entry.item.id,
                    name: entry.item.name,
                    category_id: entry.item.category_id,
                    quantity: entry.item.quantity,
                    price: entry.item.price,
                })
                .collect(),
            financial: report.financial.into(),
            categories: report
                .categories
                .into_iter()
                .map(|entry| CategoryDistributionDto {
                    id: entry.category.id,
                    name: entry.category.name,
                    count: ItemCount {
                        items: entry.item_count,
                    },
                })
                .collect(),
            recent_transactions: report
                .recent_transactions
                .into_iter()
                .map(|txn| RecentTransactionDto {
                    id: txn.id,
                    kind: txn.kind,
                    amount: txn.amount,
                    description: txn.description,
                    created_at: txn.created_at,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Item, UserRole};
    use serde_json::json;

    #[test]
    fn test_category_dto_shape() {
        let category = Category::new("Tools");
        let value = serde_json::to_value(CategoryDto::from(CategoryWithCount {
            category: category.clone(),
            item_count: 4,
        }))
        .unwrap();

        assert_eq!(value["id"], json!(category.id.to_full_string()));
        assert_eq!(value["_count"], json!({ "items": 4 }));
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn test_item_dto_shape() {
        let category = Category::new("Electronics");
        let item = Item::new("Laptop", category.id, 15, Money::from_cents(99999));
        let value = serde_json::to_value(ItemDto::from(ItemWithCategory {
            item,
            category: Some(category.clone()),
        }))
        .unwrap();

        assert_eq!(value["price"], json!(999.99));
        assert_eq!(value["categoryId"], json!(category.id.to_full_string()));
        assert_eq!(value["category"]["name"], "Electronics");
    }

    #[test]
    fn test_transaction_dto_nulls() {
        let txn = Transaction::new(TransactionKind::Income, Money::from_cents(50000));
        let value = serde_json::to_value(TransactionDto::from(txn)).unwrap();
        assert_eq!(value["type"], "income");
        assert_eq!(value["amount"], json!(500.0));
        assert!(value["description"].is_null());
        assert!(value["itemId"].is_null());
    }

    #[test]
    fn test_setting_dto_decodes_value() {
        let setting = Setting::new("low_stock_threshold", json!("{\"threshold\":5}"), true);
        let value = serde_json::to_value(SettingDto::from(setting)).unwrap();
        assert_eq!(value["value"], json!({ "threshold": 5 }));
        assert_eq!(value["financialTrackingEnabled"], true);
    }

    #[test]
    fn test_user_dto() {
        let user = User::new("admin@inventory.com", UserRole::Admin).with_name("Admin User");
        let value = serde_json::to_value(UserDto::from(user)).unwrap();
        assert_eq!(value["name"], "Admin User");
        assert_eq!(value["email"], "admin@inventory.com");
        assert!(value.get("role").is_none());
    }
}
