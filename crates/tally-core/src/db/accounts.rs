//! Account operations

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_amount, parse_datetime, Database};
use crate::error::Result;
use crate::models::{format_amount, Account, AccountType, NewAccount};

const ACCOUNT_COLUMNS: &str =
    "id, owner, name, account_type, institution, currency, balance, created_at";

fn account_from_row(row: &Row<'_>) -> rusqlite::Result<Account> {
    let account_type_str: String = row.get(3)?;
    let balance_str: String = row.get(6)?;
    let created_at_str: String = row.get(7)?;

    Ok(Account {
        id: row.get(0)?,
        owner: row.get(1)?,
        name: row.get(2)?,
        account_type: account_type_str.parse().unwrap_or(AccountType::Other),
        institution: row.get(4)?,
        currency: row.get(5)?,
        balance: parse_amount(6, &balance_str)?,
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// Create an account, returning its ID
    pub fn insert_account(&self, account: &NewAccount) -> Result<i64> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO accounts (owner, name, account_type, institution, currency, balance)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                account.owner,
                account.name,
                account.account_type.as_str(),
                account.institution,
                account.currency,
                format_amount(account.balance),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List an owner's accounts in creation order
    pub fn list_accounts(&self, owner: &str) -> Result<Vec<Account>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM accounts WHERE owner = ? ORDER BY id",
            ACCOUNT_COLUMNS
        ))?;

        let accounts = stmt
            .query_map(params![owner], account_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(accounts)
    }

    /// Get an account by ID
    pub fn get_account(&self, id: i64) -> Result<Option<Account>> {
        let conn = self.conn()?;
        let account = conn
            .query_row(
                &format!("SELECT {} FROM accounts WHERE id = ?", ACCOUNT_COLUMNS),
                params![id],
                account_from_row,
            )
            .optional()?;

        Ok(account)
    }
}
