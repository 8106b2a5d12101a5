//! Listing commands (accounts, categories, import history)

use anyhow::Result;
use tally_core::{db::Database, models::ImportStatus};

use super::truncate;

pub fn cmd_accounts(db: &Database, owner: &str) -> Result<()> {
    let accounts = db.list_accounts(owner)?;

    if accounts.is_empty() {
        println!("No accounts yet. One is created on the first import.");
        return Ok(());
    }

    println!();
    println!("🏦 Accounts");
    println!("   ─────────────────────────────────────────────────────────────");

    for account in accounts {
        println!(
            "   {:>4} │ {:<30} │ {:<12} │ {}",
            account.id,
            truncate(&account.name, 30),
            account.account_type.as_str(),
            account.institution.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}

pub fn cmd_categories(db: &Database, owner: &str) -> Result<()> {
    let categories = db.list_categories(owner)?;

    if categories.is_empty() {
        println!("No categories yet. They are created from imported Monzo categories.");
        return Ok(());
    }

    println!();
    println!("🏷️  Categories");
    println!("   ─────────────────────────────────────────────────────────────");

    for category in categories {
        println!(
            "   {:>4} │ {:<24} │ {} │ {}",
            category.id,
            truncate(&category.name, 24),
            category.color,
            category.icon
        );
    }

    Ok(())
}

pub fn cmd_history(db: &Database, owner: &str, limit: i64) -> Result<()> {
    let logs = db.list_import_logs(owner, limit, 0)?;

    if logs.is_empty() {
        println!("No imports yet. Run one with:");
        println!("  tally import --file monzo.csv");
        return Ok(());
    }

    let total = db.count_import_logs(owner)?;

    println!();
    println!("📜 Import History ({} total)", total);
    println!("   ─────────────────────────────────────────────────────────────");

    for log in logs {
        let status = match log.status {
            ImportStatus::Completed => "✅",
            ImportStatus::Failed => "❌",
        };
        println!(
            "   {} {} │ {:<40} │ {}/{}",
            status,
            log.completed_at.format("%Y-%m-%d %H:%M"),
            truncate(&log.source, 40),
            log.records_imported,
            log.records_processed
        );
        if let Some(message) = &log.error_message {
            println!("      {}", truncate(message, 70));
        }
    }

    Ok(())
}
