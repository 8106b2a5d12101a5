//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Import Monzo spreadsheets into a personal finance ledger
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Monzo spreadsheet importer for the Tally finance ledger", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "tally.db", global = true)]
    pub db: PathBuf,

    /// Owner whose data is read and written (defaults to [import] owner in config)
    #[arg(long, global = true)]
    pub owner: Option<String>,

    /// Config file (defaults to ~/.local/share/tally/config.toml, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Import a Monzo spreadsheet exported as CSV
    Import {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,

        /// Sheet name recorded in the import log (defaults to [import] source_label)
        #[arg(short, long)]
        sheet_name: Option<String>,

        /// Print the import result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch a sheet from Google Sheets and import it
    Sync {
        /// Sheet to fetch (defaults to [import] source_label)
        #[arg(short, long)]
        sheet_name: Option<String>,

        /// Print the import result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show recent imports
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// List accounts
    Accounts,

    /// List categories
    Categories,

    /// List recent transactions
    Transactions {
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}
