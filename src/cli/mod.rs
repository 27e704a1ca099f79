//! CLI command handlers
//!
//! This module contains the implementation of CLI commands, bridging the clap
//! argument parsing with the request boundary. By default every command
//! prints the same JSON envelope the `api` routes produce; `--table` switches
//! listings to human-readable tables.

pub mod category;
pub mod export;
pub mod item;
pub mod setting;
pub mod transaction;

pub use category::{handle_category_command, CategoryCommands};
pub use export::{handle_export_command, ExportArgs};
pub use item::{handle_item_command, ItemCommands};
pub use setting::{handle_setting_command, SettingCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use std::process::ExitCode;

use crate::api::{ApiResponse, ResponseBody};
use crate::config::settings::AppSettings;
use crate::error::{StockbookError, StockbookResult};
use crate::models::CategoryId;
use crate::services::CategoryService;
use crate::storage::Storage;

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputOptions {
    pub table: bool,
    pub pretty: bool,
}

impl OutputOptions {
    pub fn new(settings: &AppSettings, table: bool) -> Self {
        Self {
            table,
            pretty: settings.pretty_json,
        }
    }
}

/// Print a response. Error statuses exit non-zero with the envelope on stderr.
pub fn emit(response: ApiResponse, options: OutputOptions) -> StockbookResult<ExitCode> {
    let success = response.is_success();
    let text = match response.body {
        ResponseBody::Json(value) => {
            if options.pretty {
                serde_json::to_string_pretty(&value)?
            } else {
                serde_json::to_string(&value)?
            }
        }
        ResponseBody::Attachment { body, .. } => body,
    };

    if success {
        println!("{}", text);
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("{}", text);
        Ok(ExitCode::FAILURE)
    }
}

/// Resolve a category given by full id or exact name to its id string.
/// A well-formed id that matches nothing passes through so the route reports it.
pub(crate) fn resolve_category(storage: &Storage, identifier: &str) -> StockbookResult<String> {
    if let Some(category) = CategoryService::new(storage).find(identifier)? {
        return Ok(category.id.to_full_string());
    }
    identifier
        .parse::<CategoryId>()
        .map(|id| id.to_full_string())
        .map_err(|_| StockbookError::category_not_found(identifier))
}
