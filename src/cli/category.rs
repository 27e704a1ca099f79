//! Category CLI commands

use std::process::ExitCode;

use clap::Subcommand;
use serde_json::json;

use super::{emit, resolve_category, OutputOptions};
use crate::api;
use crate::display::{category_table, format_category_details};
use crate::error::{StockbookError, StockbookResult};
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// List all categories with item counts
    List,

    /// Create a new category
    Create {
        /// Category name (must be unique)
        name: String,
    },

    /// Show category details
    Show {
        /// Category name or ID
        category: String,
    },

    /// Rename a category
    Rename {
        /// Category name or ID
        category: String,
        /// New name
        name: String,
    },

    /// Delete a category and every item in it
    Delete {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command(
    storage: &Storage,
    cmd: CategoryCommands,
    options: OutputOptions,
) -> StockbookResult<ExitCode> {
    let response = match cmd {
        CategoryCommands::List if options.table => {
            let categories = CategoryService::new(storage).list()?;
            print!("{}", category_table(&categories));
            return Ok(ExitCode::SUCCESS);
        }
        CategoryCommands::List => api::list_categories(storage),

        CategoryCommands::Create { name } => {
            api::create_category(storage, &json!({ "name": name }))
        }

        CategoryCommands::Show { category } if options.table => {
            let service = CategoryService::new(storage);
            let found = service
                .find(&category)?
                .ok_or_else(|| StockbookError::category_not_found(&category))?;
            print!("{}", format_category_details(&service.get(found.id)?));
            return Ok(ExitCode::SUCCESS);
        }
        CategoryCommands::Show { category } => {
            api::get_category(storage, &resolve_category(storage, &category)?)
        }

        CategoryCommands::Rename { category, name } => api::update_category(
            storage,
            &resolve_category(storage, &category)?,
            &json!({ "name": name }),
        ),

        CategoryCommands::Delete { category } => {
            api::delete_category(storage, &resolve_category(storage, &category)?)
        }
    };

    emit(response, options)
}
