//! CLI command for data export

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, ValueEnum};

use super::{emit, OutputOptions};
use crate::api::{self, ResponseBody};
use crate::error::StockbookResult;
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Csv,
    Json,
}

/// Which collections to export
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ScopeArg {
    /// Items and categories
    Inventory,
    /// Transactions
    Financial,
    All,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: FormatArg,

    #[arg(short = 't', long = "type", value_enum, default_value = "all")]
    pub scope: ScopeArg,

    /// Directory to write the export file into
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Print to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,
}

/// Handle the export command
pub fn handle_export_command(
    storage: &Storage,
    args: ExportArgs,
    options: OutputOptions,
) -> StockbookResult<ExitCode> {
    let mut query = HashMap::new();
    let format = match args.format {
        FormatArg::Csv => "csv",
        FormatArg::Json => "json",
    };
    let scope = match args.scope {
        ScopeArg::Inventory => "inventory",
        ScopeArg::Financial => "financial",
        ScopeArg::All => "all",
    };
    query.insert("format".to_string(), format.to_string());
    query.insert("type".to_string(), scope.to_string());

    let response = api::export(storage, &query);
    if args.stdout {
        return emit(response, options);
    }

    match response.body {
        ResponseBody::Attachment { filename, body, .. } => {
            fs::create_dir_all(&args.output_dir)?;
            let path = args.output_dir.join(filename);
            fs::write(&path, body)?;
            println!("Exported {} data to {}", scope, path.display());
            Ok(ExitCode::SUCCESS)
        }
        ResponseBody::Json(_) => emit(response, options),
    }
}
