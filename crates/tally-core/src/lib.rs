//! Tally Core Library
//!
//! Shared functionality for the Tally finance backend:
//! - Database access and migrations
//! - Monzo spreadsheet ingestion pipeline
//! - Google Sheets values client
//! - Configuration loading

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod sheets;
pub mod sheets_client;
pub mod store;

/// Test utilities including an instrumented store
#[cfg(test)]
pub mod test_utils;

pub use config::TallyConfig;
pub use db::Database;
pub use error::{Error, Result};
pub use sheets::{import_batch, ImportOptions};
pub use sheets_client::{SheetsClient, SheetsCredentials};
pub use store::ImportStore;
