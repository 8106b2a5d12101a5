//! Tally CLI - Monzo spreadsheet importer
//!
//! Usage:
//!   tally init                   Initialize database
//!   tally import --file CSV      Import a Monzo export saved as CSV
//!   tally sync                   Import straight from Google Sheets
//!   tally serve --port 3000      Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use clap::Parser;
use tally_core::TallyConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = TallyConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    tracing::debug!("Loaded config: {:?}", config);
    let owner = cli
        .owner
        .clone()
        .unwrap_or_else(|| config.import.owner.clone());

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Import {
            file,
            sheet_name,
            json,
        } => {
            let db = commands::open_db(&cli.db)?;
            let sheet_name = sheet_name.unwrap_or_else(|| config.import.source_label.clone());
            let result = commands::cmd_import(
                &db,
                &owner,
                &file,
                &sheet_name,
                &config.import_options(),
            )?;
            commands::print_import_result(&result, json)
        }
        Commands::Sync { sheet_name, json } => {
            let db = commands::open_db(&cli.db)?;
            let sheet_name = sheet_name.unwrap_or_else(|| config.import.source_label.clone());
            let result = commands::cmd_sync(&db, &owner, &config, &sheet_name).await?;
            commands::print_import_result(&result, json)
        }
        Commands::History { limit } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_history(&db, &owner, limit)
        }
        Commands::Accounts => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_accounts(&db, &owner)
        }
        Commands::Categories => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_categories(&db, &owner)
        }
        Commands::Transactions { limit } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_transactions_list(&db, &owner, limit)
        }
        Commands::Serve { port, host } => {
            commands::cmd_serve(&cli.db, &host, port, &config, &owner).await
        }
    }
}
