//! Transaction command implementations

use anyhow::Result;
use tally_core::{db::Database, models::format_amount};

use super::truncate;

pub fn cmd_transactions_list(db: &Database, owner: &str, limit: i64) -> Result<()> {
    let transactions = db.list_transactions(owner, limit, 0)?;

    if transactions.is_empty() {
        println!("No transactions found. Import some with:");
        println!("  tally import --file monzo.csv");
        return Ok(());
    }

    println!();
    println!("📝 Recent Transactions");
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in transactions {
        let amount_str = if tx.amount.is_sign_negative() {
            format!("\x1b[31m£{}\x1b[0m", format_amount(tx.amount.abs())) // Red for expenses
        } else {
            format!("\x1b[32m+£{}\x1b[0m", format_amount(tx.amount)) // Green for income
        };

        let excluded = if tx.excluded_from_budget { " (excluded)" } else { "" };

        println!(
            "   {} │ {:>10} │ {}{}",
            tx.occurred_at.format("%Y-%m-%d"),
            amount_str,
            truncate(&tx.description, 40),
            excluded
        );
    }

    Ok(())
}
