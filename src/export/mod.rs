//! Export module for Stockbook
//!
//! Both renderings consume the same [`ExportData`], assembled once per
//! request for the requested scope:
//! - CSV: labelled sections for spreadsheets
//! - JSON: the response envelope with an `exportedAt` timestamp

pub mod csv;
pub mod json;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{StockbookError, StockbookResult};
use crate::models::{money::serialize_decimal, CategoryId, ItemId, Money, TransactionId, TransactionKind};
use crate::services::{ItemFilter, ItemService};
use crate::storage::Storage;

pub use self::csv::render_csv;
pub use self::json::{render_json, JsonExport, EXPORT_SCHEMA_VERSION};

/// Output format of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    Csv,
    #[default]
    Json,
}

impl FromStr for ExportFormat {
    type Err = StockbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(StockbookError::Validation(format!(
                "Invalid export format '{}': expected csv or json",
                other
            ))),
        }
    }
}

/// Which collections an export includes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportScope {
    /// Items and categories
    Inventory,
    /// Transactions
    Financial,
    #[default]
    All,
}

impl ExportScope {
    pub fn includes_inventory(&self) -> bool {
        matches!(self, Self::Inventory | Self::All)
    }

    pub fn includes_financial(&self) -> bool {
        matches!(self, Self::Financial | Self::All)
    }
}

impl FromStr for ExportScope {
    type Err = StockbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inventory" => Ok(Self::Inventory),
            "financial" => Ok(Self::Financial),
            "all" => Ok(Self::All),
            other => Err(StockbookError::Validation(format!(
                "Invalid export type '{}': expected inventory, financial or all",
                other
            ))),
        }
    }
}

impl fmt::Display for ExportScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inventory => write!(f, "inventory"),
            Self::Financial => write!(f, "financial"),
            Self::All => write!(f, "all"),
        }
    }
}

/// An item flattened for export, with its category name instead of its id
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportItem {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    pub quantity: u32,
    #[serde(serialize_with = "serialize_decimal")]
    pub price: Money,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportCategory {
    pub id: CategoryId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportTransaction {
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(serialize_with = "serialize_decimal")]
    pub amount: Money,
    /// `null` in JSON, empty in CSV
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The scoped data set shared by both renderers. Collections outside the
/// scope are `None` and omitted from the output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExportData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ExportItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<ExportCategory>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<ExportTransaction>>,
}

impl ExportData {
    /// Read the collections in `scope` from current store state
    pub fn collect(storage: &Storage, scope: ExportScope) -> StockbookResult<Self> {
        let mut data = Self::default();

        if scope.includes_inventory() {
            let items = ItemService::new(storage)
                .list(&ItemFilter::default())?
                .into_iter()
                .map(|entry| ExportItem {
                    category: entry.category_name().to_string(),
                    id: entry.item.id,
                    name: entry.item.name,
                    quantity: entry.item.quantity,
                    price: entry.item.price,
                    created_at: entry.item.created_at,
                })
                .collect();

            let categories = storage
                .categories
                .get_all()?
                .into_iter()
                .map(|c| ExportCategory {
                    id: c.id,
                    name: c.name,
                    created_at: c.created_at,
                })
                .collect();

            data.items = Some(items);
            data.categories = Some(categories);
        }

        if scope.includes_financial() {
            let transactions = storage
                .transactions
                .get_all()?
                .into_iter()
                .map(|t| ExportTransaction {
                    id: t.id,
                    kind: t.kind,
                    amount: t.amount,
                    description: t.description,
                    created_at: t.created_at,
                })
                .collect();
            data.transactions = Some(transactions);
        }

        Ok(data)
    }
}

/// A rendered export ready to be sent as an attachment
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOutput {
    pub content_type: &'static str,
    pub filename: String,
    pub body: String,
}

/// Attachment name, `inventory-export-<unix-millis>.<ext>`
pub fn export_filename(at: DateTime<Utc>, format: ExportFormat) -> String {
    let ext = match format {
        ExportFormat::Csv => "csv",
        ExportFormat::Json => "json",
    };
    format!("inventory-export-{}.{}", at.timestamp_millis(), ext)
}

/// Collect and render an export
pub fn export_data(
    storage: &Storage,
    format: ExportFormat,
    scope: ExportScope,
) -> StockbookResult<ExportOutput> {
    let data = ExportData::collect(storage, scope)?;
    let now = Utc::now();

    let (content_type, body) = match format {
        ExportFormat::Csv => ("text/csv", render_csv(&data)?),
        ExportFormat::Json => ("application/json", render_json(&data, now, true)?),
    };

    tracing::info!(?format, %scope, bytes = body.len(), "export rendered");

    Ok(ExportOutput {
        content_type,
        filename: export_filename(now, format),
        body,
    })
}
