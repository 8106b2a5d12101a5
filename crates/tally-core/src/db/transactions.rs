//! Transaction operations

use std::collections::HashSet;

use rusqlite::{params, params_from_iter, Connection, Row};

use super::{parse_amount, parse_datetime, parse_local_datetime, Database, DATETIME_FORMAT};
use crate::error::Result;
use crate::models::{format_amount, NewTransactionRecord, Transaction, TransactionKind};

/// Upper bound on bound parameters per dedup lookup
const LOOKUP_CHUNK_SIZE: usize = 500;

const INSERT_SQL: &str = r#"
    INSERT INTO transactions (
        account_id, external_id, date, occurred_at, description, amount, merchant,
        category_id, notes, transaction_type, currency, is_excluded_from_budget
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

fn insert_record(conn: &Connection, tx: &NewTransactionRecord) -> rusqlite::Result<i64> {
    conn.prepare_cached(INSERT_SQL)?.execute(params![
        tx.account_id,
        tx.external_id,
        tx.occurred_at.date().to_string(),
        tx.occurred_at.format(DATETIME_FORMAT).to_string(),
        tx.description,
        format_amount(tx.amount),
        tx.merchant,
        tx.category_id,
        tx.notes,
        tx.kind.as_str(),
        tx.currency,
        tx.excluded_from_budget,
    ])?;
    Ok(conn.last_insert_rowid())
}

fn transaction_from_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let occurred_at_str: String = row.get(3)?;
    let amount_str: String = row.get(5)?;
    let kind_str: String = row.get(9)?;
    let created_at_str: String = row.get(12)?;

    Ok(Transaction {
        id: row.get(0)?,
        account_id: row.get(1)?,
        external_id: row.get(2)?,
        occurred_at: parse_local_datetime(3, &occurred_at_str)?,
        description: row.get(4)?,
        amount: parse_amount(5, &amount_str)?,
        merchant: row.get(6)?,
        category_id: row.get(7)?,
        notes: row.get(8)?,
        kind: kind_str.parse().unwrap_or(TransactionKind::Other),
        currency: row.get(10)?,
        excluded_from_budget: row.get(11)?,
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// Return the subset of `external_ids` already present in the store
    pub fn existing_external_ids(&self, external_ids: &[String]) -> Result<HashSet<String>> {
        let mut found = HashSet::new();
        if external_ids.is_empty() {
            return Ok(found);
        }

        let conn = self.conn()?;
        for chunk in external_ids.chunks(LOOKUP_CHUNK_SIZE) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let mut stmt = conn.prepare(&format!(
                "SELECT external_id FROM transactions WHERE external_id IN ({})",
                placeholders
            ))?;

            let ids = stmt
                .query_map(params_from_iter(chunk.iter()), |row| row.get::<_, String>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            found.extend(ids);
        }

        Ok(found)
    }

    /// Insert a batch of transactions atomically
    ///
    /// Either every record is written or none is.
    pub fn insert_transactions(&self, records: &[NewTransactionRecord]) -> Result<usize> {
        let mut conn = self.conn()?;

        // Rolls back on drop unless committed
        let tx = conn.transaction()?;
        for record in records {
            insert_record(&tx, record)?;
        }
        tx.commit()?;

        Ok(records.len())
    }

    /// Insert a single transaction, returning its ID
    pub fn insert_transaction(&self, record: &NewTransactionRecord) -> Result<i64> {
        let conn = self.conn()?;
        Ok(insert_record(&conn, record)?)
    }

    /// List an owner's transactions, newest first
    pub fn list_transactions(&self, owner: &str, limit: i64, offset: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT t.id, t.account_id, t.external_id, t.occurred_at, t.description, t.amount,
                   t.merchant, t.category_id, t.notes, t.transaction_type, t.currency,
                   t.is_excluded_from_budget, t.created_at
            FROM transactions t
            JOIN accounts a ON a.id = t.account_id
            WHERE a.owner = ?
            ORDER BY t.occurred_at DESC, t.id DESC
            LIMIT ? OFFSET ?
            "#,
        )?;

        let transactions = stmt
            .query_map(params![owner, limit, offset], transaction_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Count an owner's transactions
    pub fn count_transactions(&self, owner: &str) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            r#"
            SELECT COUNT(*) FROM transactions t
            JOIN accounts a ON a.id = t.account_id
            WHERE a.owner = ?
            "#,
            params![owner],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
