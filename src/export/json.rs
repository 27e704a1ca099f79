//! JSON export
//!
//! The export document is the usual response envelope plus a timestamp and a
//! schema version for consumers that archive exports.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ExportData;
use crate::error::StockbookResult;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Serialized export document
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonExport<'a> {
    pub success: bool,
    pub schema_version: &'static str,
    pub data: &'a ExportData,
    pub exported_at: DateTime<Utc>,
}

impl<'a> JsonExport<'a> {
    pub fn new(data: &'a ExportData, exported_at: DateTime<Utc>) -> Self {
        Self {
            success: true,
            schema_version: EXPORT_SCHEMA_VERSION,
            data,
            exported_at,
        }
    }
}

/// Render an export as a JSON document
pub fn render_json(
    data: &ExportData,
    exported_at: DateTime<Utc>,
    pretty: bool,
) -> StockbookResult<String> {
    let doc = JsonExport::new(data, exported_at);
    let body = if pretty {
        serde_json::to_string_pretty(&doc)?
    } else {
        serde_json::to_string(&doc)?
    };
    Ok(body)
}
