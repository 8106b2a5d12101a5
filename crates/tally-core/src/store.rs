//! Storage seam used by the import pipeline
//!
//! The pipeline only needs a handful of operations, so it talks to this trait
//! rather than to `Database` directly. Tests substitute failing stores.

use std::collections::HashSet;

use crate::db::Database;
use crate::error::Result;
use crate::models::{Account, Category, NewAccount, NewCategory, NewImportLog, NewTransactionRecord};

pub trait ImportStore {
    /// All categories belonging to `owner`
    fn list_categories(&self, owner: &str) -> Result<Vec<Category>>;

    /// Create categories for `owner`, returning the stored rows
    fn insert_categories(&self, owner: &str, categories: &[NewCategory]) -> Result<Vec<Category>>;

    /// All accounts belonging to `owner`, oldest first
    fn list_accounts(&self, owner: &str) -> Result<Vec<Account>>;

    fn insert_account(&self, account: &NewAccount) -> Result<i64>;

    /// The subset of `external_ids` already stored
    fn existing_external_ids(&self, external_ids: &[String]) -> Result<HashSet<String>>;

    /// Write every record or none
    fn insert_transactions(&self, records: &[NewTransactionRecord]) -> Result<usize>;

    fn insert_transaction(&self, record: &NewTransactionRecord) -> Result<i64>;

    fn append_import_log(&self, entry: &NewImportLog) -> Result<i64>;
}

impl ImportStore for Database {
    fn list_categories(&self, owner: &str) -> Result<Vec<Category>> {
        Database::list_categories(self, owner)
    }

    fn insert_categories(&self, owner: &str, categories: &[NewCategory]) -> Result<Vec<Category>> {
        Database::insert_categories(self, owner, categories)
    }

    fn list_accounts(&self, owner: &str) -> Result<Vec<Account>> {
        Database::list_accounts(self, owner)
    }

    fn insert_account(&self, account: &NewAccount) -> Result<i64> {
        Database::insert_account(self, account)
    }

    fn existing_external_ids(&self, external_ids: &[String]) -> Result<HashSet<String>> {
        Database::existing_external_ids(self, external_ids)
    }

    fn insert_transactions(&self, records: &[NewTransactionRecord]) -> Result<usize> {
        Database::insert_transactions(self, records)
    }

    fn insert_transaction(&self, record: &NewTransactionRecord) -> Result<i64> {
        Database::insert_transaction(self, record)
    }

    fn append_import_log(&self, entry: &NewImportLog) -> Result<i64> {
        Database::append_import_log(self, entry)
    }
}
