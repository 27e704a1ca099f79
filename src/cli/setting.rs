//! Setting CLI commands

use std::process::ExitCode;

use clap::Subcommand;
use serde_json::{json, Map, Value};

use super::{emit, OutputOptions};
use crate::api::{self, dto::SettingDto, ApiResponse};
use crate::error::StockbookResult;
use crate::services::SettingsService;
use crate::storage::Storage;

/// Setting subcommands
#[derive(Subcommand, Debug)]
pub enum SettingCommands {
    /// List all setting records
    List,

    /// Create or replace a setting record
    Set {
        key: String,
        /// JSON payload; anything that is not valid JSON is stored as a string
        value: String,
        /// Financial gate flag for the record
        #[arg(long)]
        financial_tracking_enabled: Option<bool>,
    },

    /// Turn financial tracking on or off
    Financial {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },

    /// Set the low-stock threshold
    Threshold { threshold: u32 },
}

/// Handle a setting command
pub fn handle_setting_command(
    storage: &Storage,
    cmd: SettingCommands,
    options: OutputOptions,
) -> StockbookResult<ExitCode> {
    let service = SettingsService::new(storage);

    let response = match cmd {
        SettingCommands::List => api::list_settings(storage),

        SettingCommands::Set {
            key,
            value,
            financial_tracking_enabled,
        } => {
            let value = serde_json::from_str::<Value>(&value).unwrap_or(Value::String(value));
            let mut payload = Map::new();
            payload.insert("key".into(), json!(key));
            payload.insert("value".into(), value);
            if let Some(enabled) = financial_tracking_enabled {
                payload.insert("financialTrackingEnabled".into(), json!(enabled));
            }
            api::upsert_setting(storage, &Value::Object(payload))
        }

        SettingCommands::Financial { enabled } => {
            let setting = service.set_financial_tracking(enabled)?;
            ApiResponse::ok(SettingDto::from(setting))
        }

        SettingCommands::Threshold { threshold } => {
            let setting = service.set_low_stock_threshold(threshold)?;
            ApiResponse::ok(SettingDto::from(setting))
        }
    };

    emit(response, options)
}
