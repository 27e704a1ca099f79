//! Transaction CLI commands

use std::collections::HashMap;
use std::process::ExitCode;

use clap::Subcommand;
use serde_json::{json, Map, Value};

use super::{emit, OutputOptions};
use crate::api;
use crate::display::transaction_table;
use crate::error::StockbookResult;
use crate::services::{TransactionFilter, TransactionService, DEFAULT_TRANSACTION_LIMIT};
use crate::storage::Storage;
use crate::validation::validate_query;

/// Transaction subcommands
#[derive(Subcommand, Debug)]
pub enum TransactionCommands {
    /// List transactions, newest first
    List {
        /// Only "income" or "expense"
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        #[arg(short, long, default_value_t = DEFAULT_TRANSACTION_LIMIT)]
        limit: usize,
    },

    /// Record a transaction (refused while financial tracking is off)
    Add {
        /// "income" or "expense"
        kind: String,
        /// Amount (e.g. "500" or "49.99")
        amount: f64,
        #[arg(short, long)]
        description: Option<String>,
        /// Related item ID
        #[arg(short, long)]
        item: Option<String>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    cmd: TransactionCommands,
    options: OutputOptions,
) -> StockbookResult<ExitCode> {
    let response = match cmd {
        TransactionCommands::List { kind, limit } => {
            let mut query = HashMap::new();
            query.insert("limit".to_string(), limit.to_string());
            if let Some(kind) = kind {
                query.insert("type".to_string(), kind);
            }

            if options.table {
                let filter: TransactionFilter = validate_query(&query)?;
                let transactions = TransactionService::new(storage).list(&filter)?;
                print!("{}", transaction_table(&transactions));
                return Ok(ExitCode::SUCCESS);
            }
            api::list_transactions(storage, &query)
        }

        TransactionCommands::Add {
            kind,
            amount,
            description,
            item,
        } => {
            let mut payload = Map::new();
            payload.insert("type".into(), json!(kind));
            payload.insert("amount".into(), json!(amount));
            if let Some(description) = description {
                payload.insert("description".into(), json!(description));
            }
            if let Some(item) = item {
                payload.insert("itemId".into(), json!(item));
            }
            api::create_transaction(storage, &Value::Object(payload))
        }

        TransactionCommands::Delete { id } => api::delete_transaction(storage, &id),
    };

    emit(response, options)
}
