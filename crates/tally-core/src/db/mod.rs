//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `accounts` - Bank account operations
//! - `categories` - Spending categories (including import-created ones)
//! - `transactions` - Transaction inserts, dedup lookups and listing
//! - `import_logs` - Append-only import audit trail

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rust_decimal::Decimal;
use tracing::info;

use crate::error::Result;

mod accounts;
mod categories;
mod import_logs;
mod transactions;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Storage format for timestamps we write ourselves
pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a SQLite datetime string into a DateTime<Utc>
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    // SQLite stores as "YYYY-MM-DD HH:MM:SS" format
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

/// Parse a TEXT amount column into a Decimal
pub(crate) fn parse_amount(idx: usize, s: &str) -> rusqlite::Result<Decimal> {
    Decimal::from_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a TEXT local datetime column
pub(crate) fn parse_local_datetime(idx: usize, s: &str) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Open (or create) a database file and bring its schema up to date
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path)
            .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Note: Uses a temporary file rather than `:memory:` because every pooled
    /// connection to `:memory:` would see its own empty database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "tally_test_{}_{}.db",
            std::process::id(),
            id
        ));

        // Remove any existing file
        let _ = std::fs::remove_file(&path);

        Self::new(&path.to_string_lossy())
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- Enable foreign keys
            PRAGMA foreign_keys = ON;

            -- WAL mode: readers don't block the import writer
            PRAGMA journal_mode = WAL;

            -- Cache size: ~8MB (2000 pages * 4KB default page size)
            PRAGMA cache_size = 2000;

            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;

            -- Accounts (bank accounts, one owner each)
            CREATE TABLE IF NOT EXISTS accounts (
                id INTEGER PRIMARY KEY,
                owner TEXT NOT NULL,
                name TEXT NOT NULL,
                account_type TEXT NOT NULL DEFAULT 'checking',
                institution TEXT,
                currency TEXT NOT NULL DEFAULT 'GBP',
                balance TEXT NOT NULL DEFAULT '0.00',
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_accounts_owner ON accounts(owner);

            -- Categories (user-defined or created by import)
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY,
                owner TEXT NOT NULL,
                name TEXT NOT NULL,
                color TEXT NOT NULL DEFAULT '#6366f1',
                icon TEXT NOT NULL DEFAULT 'tag',
                is_system BOOLEAN NOT NULL DEFAULT 0,
                monzo_category TEXT,                       -- external label this category maps
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_categories_owner ON categories(owner);
            CREATE INDEX IF NOT EXISTS idx_categories_monzo ON categories(owner, monzo_category);

            -- Transactions
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY,
                account_id INTEGER NOT NULL REFERENCES accounts(id),
                external_id TEXT UNIQUE,                   -- Monzo transaction ID, dedup key
                date DATE NOT NULL,
                occurred_at DATETIME NOT NULL,
                description TEXT NOT NULL,
                amount TEXT NOT NULL,                      -- decimal, 2 fractional digits
                merchant TEXT,
                category_id INTEGER REFERENCES categories(id),
                notes TEXT,
                transaction_type TEXT NOT NULL DEFAULT 'other',
                currency TEXT,
                is_excluded_from_budget BOOLEAN NOT NULL DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
            CREATE INDEX IF NOT EXISTS idx_transactions_account ON transactions(account_id);
            CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category_id);

            -- Import logs (append-only)
            CREATE TABLE IF NOT EXISTS import_logs (
                id INTEGER PRIMARY KEY,
                owner TEXT NOT NULL,
                source TEXT NOT NULL,
                records_processed INTEGER NOT NULL DEFAULT 0,
                records_imported INTEGER NOT NULL DEFAULT 0,
                status TEXT NOT NULL,                      -- completed, failed
                error_message TEXT,
                completed_at DATETIME NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_import_logs_owner ON import_logs(owner, completed_at);

            -- Budgets (read by dashboard views)
            CREATE TABLE IF NOT EXISTS budgets (
                id INTEGER PRIMARY KEY,
                owner TEXT NOT NULL,
                category_id INTEGER REFERENCES categories(id),
                amount TEXT NOT NULL,
                period TEXT NOT NULL DEFAULT 'monthly',
                start_date DATE,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_budgets_owner ON budgets(owner);

            -- Debts (read by dashboard views)
            CREATE TABLE IF NOT EXISTS debts (
                id INTEGER PRIMARY KEY,
                owner TEXT NOT NULL,
                name TEXT NOT NULL,
                balance TEXT NOT NULL,
                interest_rate TEXT,
                minimum_payment TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_debts_owner ON debts(owner);
            "#,
        )?;

        info!("Database schema initialized");
        Ok(())
    }
}
