//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;

use tally_core::db::Database;
use tally_core::models::ImportStatus;
use tally_core::ImportOptions;
use tempfile::NamedTempFile;

use crate::commands::{self, truncate};

const HEADER: &str = "Transaction ID,Date,Time,Type,Name,Emoji,Category,Amount,Currency,Local amount,Local currency,Notes and #tags,Address,Receipt,Description,Category split";

fn setup_test_db() -> Database {
    Database::in_memory().unwrap()
}

/// Write a Monzo export with two good rows and one bad date
fn monzo_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    writeln!(
        file,
        "tx_0001,16/01/2026,14:30:00,Card payment,Tesco,,Groceries,-£10.00,GBP,-10.00,GBP,,,,,"
    )
    .unwrap();
    writeln!(
        file,
        "tx_0002,17/01/2026,08:15:00,Pot transfer,Savings,,Transfers,-£50.00,GBP,-50.00,GBP,,,,,"
    )
    .unwrap();
    writeln!(
        file,
        "tx_0003,32/13/2026,10:00:00,Card payment,Pret,,Eating out,-£4.50,GBP,-4.50,GBP,,,,,"
    )
    .unwrap();
    file
}

// ========== Import Command Tests ==========

#[test]
fn test_cmd_import_csv() {
    let db = setup_test_db();
    let csv = monzo_csv();

    let result = commands::cmd_import(
        &db,
        "alice",
        csv.path(),
        "Personal Account Transactions",
        &ImportOptions::default(),
    )
    .unwrap();

    assert!(result.success);
    assert_eq!(result.total_rows, 3);
    assert_eq!(result.imported, 2);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].row, 4);

    let stored = db.list_transactions("alice", 10, 0).unwrap();
    let transfer = stored
        .iter()
        .find(|t| t.external_id.as_deref() == Some("tx_0002"))
        .unwrap();
    assert!(transfer.excluded_from_budget);

    assert!(commands::print_import_result(&result, false).is_ok());
    assert!(commands::print_import_result(&result, true).is_ok());
}

#[test]
fn test_cmd_import_twice_skips() {
    let db = setup_test_db();
    let csv = monzo_csv();
    let options = ImportOptions::default();

    commands::cmd_import(&db, "alice", csv.path(), "Sheet1", &options).unwrap();
    let again = commands::cmd_import(&db, "alice", csv.path(), "Sheet1", &options).unwrap();

    assert_eq!(again.imported, 0);
    assert_eq!(again.skipped, 2);
    assert_eq!(db.count_transactions("alice").unwrap(), 2);
}

#[test]
fn test_cmd_import_missing_file() {
    let db = setup_test_db();
    let result = commands::cmd_import(
        &db,
        "alice",
        std::path::Path::new("/nonexistent/monzo.csv"),
        "Sheet1",
        &ImportOptions::default(),
    );
    assert!(result.is_err());
}

#[test]
fn test_print_failed_result_is_error() {
    let result = tally_core::models::ImportResult {
        success: false,
        errors: vec![tally_core::models::ImportError::at_row(0, "database is locked")],
        ..Default::default()
    };
    assert!(commands::print_import_result(&result, false).is_err());
    assert!(commands::print_import_result(&result, true).is_ok());
}

// ========== Listing Command Tests ==========

#[test]
fn test_listings_empty() {
    let db = setup_test_db();
    assert!(commands::cmd_accounts(&db, "alice").is_ok());
    assert!(commands::cmd_categories(&db, "alice").is_ok());
    assert!(commands::cmd_history(&db, "alice", 20).is_ok());
    assert!(commands::cmd_transactions_list(&db, "alice", 20).is_ok());
}

#[test]
fn test_listings_after_import() {
    let db = setup_test_db();
    let csv = monzo_csv();
    commands::cmd_import(&db, "alice", csv.path(), "Sheet1", &ImportOptions::default()).unwrap();

    assert!(commands::cmd_accounts(&db, "alice").is_ok());
    assert!(commands::cmd_categories(&db, "alice").is_ok());
    assert!(commands::cmd_history(&db, "alice", 20).is_ok());
    assert!(commands::cmd_transactions_list(&db, "alice", 20).is_ok());

    let logs = db.list_import_logs("alice", 20, 0).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].status, ImportStatus::Completed);
    assert_eq!(logs[0].source, "monzo_sheets:Sheet1");
}

// ========== Core Command Tests ==========

#[test]
fn test_cmd_init_creates_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tally.db");

    commands::cmd_init(&path).unwrap();
    assert!(path.exists());

    let db = commands::open_db(&path).unwrap();
    assert_eq!(db.count_transactions("alice").unwrap(), 0);
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("Tesco", 10), "Tesco");
    assert_eq!(truncate("Sainsbury's Local", 10), "Sainsbu...");
    assert_eq!(truncate("£££££££££££", 5), "££...");
}
