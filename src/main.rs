use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use stockbook::api::{self, ApiResponse};
use stockbook::audit::AuditLogger;
use stockbook::auth::StaticSession;
use stockbook::cli::{
    emit, handle_category_command, handle_export_command, handle_item_command,
    handle_setting_command, handle_transaction_command, CategoryCommands, ExportArgs,
    ItemCommands, OutputOptions, SettingCommands, TransactionCommands,
};
use stockbook::config::{paths::StockbookPaths, settings::AppSettings};
use stockbook::display::format_dashboard;
use stockbook::reports::DashboardReport;
use stockbook::storage::{initialize_storage, seed_sample_data, Storage};

/// Environment variable holding a tracing filter, e.g. `stockbook=debug`
const LOG_ENV: &str = "STOCKBOOK_LOG";

#[derive(Parser)]
#[command(
    name = "stockbook",
    author = "Kaylee Beyene",
    version,
    about = "Inventory and bookkeeping for small businesses",
    long_about = "Stockbook tracks inventory items by category, records income and \
                  expenses, flags low stock and exports everything as CSV or JSON."
)]
struct Cli {
    /// Render listings as tables instead of JSON
    #[arg(long, global = true)]
    table: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and default configuration
    Init,

    /// Replace all data with the sample data set
    Seed,

    /// Show current configuration and paths
    Config,

    /// Category management commands
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Inventory item commands
    #[command(subcommand)]
    Item(ItemCommands),

    /// Income and expense commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Setting records, the financial gate and the low-stock threshold
    #[command(subcommand)]
    Setting(SettingCommands),

    /// Counts, low stock, financial totals and recent transactions
    Dashboard,

    /// Export data as CSV or JSON
    Export(ExportArgs),

    /// Profile of the signed-in user
    #[command(subcommand)]
    Profile(ProfileCommands),

    /// Show recent audit log entries
    Audit {
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Change the display name
    Update {
        #[arg(short, long)]
        name: String,
    },
}

fn init_tracing(settings: &AppSettings) {
    let filter = std::env::var(LOG_ENV).unwrap_or_else(|_| settings.log_level.clone());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = StockbookPaths::new()?;
    let settings = AppSettings::load_or_create(&paths)?;
    init_tracing(&settings);

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.set_audit_enabled(settings.audit_enabled);
    storage.load_all()?;

    let options = OutputOptions::new(&settings, cli.table);

    let code = match cli.command {
        Some(Commands::Init) => {
            initialize_storage(&paths)?;
            println!("Initialized stockbook at: {}", paths.base_dir().display());
            println!();
            println!("Run 'stockbook seed' to load sample data.");
            ExitCode::SUCCESS
        }
        Some(Commands::Seed) => {
            initialize_storage(&paths)?;
            let summary = seed_sample_data(&storage)?;
            emit(ApiResponse::ok(summary), options)?
        }
        Some(Commands::Config) => {
            println!("Stockbook Configuration");
            println!("=======================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Log level:       {}", settings.log_level);
            println!("  Audit enabled:   {}", settings.audit_enabled);
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!(
                "  Signed in as:    {}",
                settings.principal_email.as_deref().unwrap_or("(nobody)")
            );
            ExitCode::SUCCESS
        }
        Some(Commands::Category(cmd)) => handle_category_command(&storage, cmd, options)?,
        Some(Commands::Item(cmd)) => handle_item_command(&storage, cmd, options)?,
        Some(Commands::Transaction(cmd)) => handle_transaction_command(&storage, cmd, options)?,
        Some(Commands::Setting(cmd)) => handle_setting_command(&storage, cmd, options)?,
        Some(Commands::Dashboard) if cli.table => {
            let report = DashboardReport::generate(&storage)?;
            print!("{}", format_dashboard(&report, &settings.currency_symbol));
            ExitCode::SUCCESS
        }
        Some(Commands::Dashboard) => emit(api::dashboard(&storage), options)?,
        Some(Commands::Export(args)) => handle_export_command(&storage, args, options)?,
        Some(Commands::Profile(ProfileCommands::Update { name })) => {
            let session = StaticSession::from_settings(&settings);
            emit(
                api::update_profile(&storage, &session, &json!({ "name": name })),
                options,
            )?
        }
        Some(Commands::Audit { limit }) => {
            let logger = AuditLogger::new(paths.audit_log());
            let entries = logger.read_recent(limit)?;
            if entries.is_empty() {
                println!("No audit entries.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
            ExitCode::SUCCESS
        }
        None => {
            println!("Stockbook - inventory and bookkeeping");
            println!();
            println!("Run 'stockbook --help' for usage information.");
            ExitCode::SUCCESS
        }
    };

    Ok(code)
}
