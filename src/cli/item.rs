//! Item CLI commands

use std::collections::HashMap;
use std::process::ExitCode;

use clap::Subcommand;
use serde_json::{json, Map, Value};

use super::{emit, resolve_category, OutputOptions};
use crate::api;
use crate::display::{format_item_details, item_table};
use crate::error::{StockbookError, StockbookResult};
use crate::models::ItemId;
use crate::services::{ItemFilter, ItemService, SettingsService};
use crate::storage::Storage;
use crate::validation::validate_query;

/// Item subcommands
#[derive(Subcommand, Debug)]
pub enum ItemCommands {
    /// List items, newest first
    List {
        /// Case-insensitive name search
        #[arg(short, long)]
        search: Option<String>,
        /// Only items in this category (name or ID)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Add an item
    Add {
        /// Item name
        name: String,
        /// Category name or ID
        #[arg(short, long)]
        category: String,
        /// Units in stock
        #[arg(short, long, default_value = "0")]
        quantity: u32,
        /// Unit price (e.g. "999.99")
        #[arg(short, long)]
        price: f64,
    },

    /// Show item details
    Show {
        /// Item ID
        id: String,
    },

    /// Change any of an item's fields
    Update {
        /// Item ID
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        /// Move to another category (name or ID)
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        quantity: Option<u32>,
        #[arg(short, long)]
        price: Option<f64>,
    },

    /// Delete an item
    Delete {
        /// Item ID
        id: String,
    },
}

/// Handle an item command
pub fn handle_item_command(
    storage: &Storage,
    cmd: ItemCommands,
    options: OutputOptions,
) -> StockbookResult<ExitCode> {
    let response = match cmd {
        ItemCommands::List { search, category } => {
            let mut query = HashMap::new();
            if let Some(search) = search {
                query.insert("search".to_string(), search);
            }
            if let Some(category) = category {
                query.insert(
                    "categoryId".to_string(),
                    resolve_category(storage, &category)?,
                );
            }

            if options.table {
                let filter: ItemFilter = validate_query(&query)?;
                let items = ItemService::new(storage).list(&filter)?;
                let threshold = SettingsService::new(storage).config()?.low_stock_threshold;
                print!("{}", item_table(&items, threshold));
                return Ok(ExitCode::SUCCESS);
            }
            api::list_items(storage, &query)
        }

        ItemCommands::Add {
            name,
            category,
            quantity,
            price,
        } => api::create_item(
            storage,
            &json!({
                "name": name,
                "categoryId": resolve_category(storage, &category)?,
                "quantity": quantity,
                "price": price,
            }),
        ),

        ItemCommands::Show { id } if options.table => {
            let id: ItemId = id
                .parse()
                .map_err(|_| StockbookError::item_not_found(&id))?;
            print!("{}", format_item_details(&ItemService::new(storage).get(id)?));
            return Ok(ExitCode::SUCCESS);
        }
        ItemCommands::Show { id } => api::get_item(storage, &id),

        ItemCommands::Update {
            id,
            name,
            category,
            quantity,
            price,
        } => {
            let mut payload = Map::new();
            if let Some(name) = name {
                payload.insert("name".into(), json!(name));
            }
            if let Some(category) = category {
                payload.insert(
                    "categoryId".into(),
                    json!(resolve_category(storage, &category)?),
                );
            }
            if let Some(quantity) = quantity {
                payload.insert("quantity".into(), json!(quantity));
            }
            if let Some(price) = price {
                payload.insert("price".into(), json!(price));
            }
            api::update_item(storage, &id, &Value::Object(payload))
        }

        ItemCommands::Delete { id } => api::delete_item(storage, &id),
    };

    emit(response, options)
}
