//! Test utilities for tally-core
//!
//! `MockStore` wraps a throwaway `Database`, counts every store call and can be
//! told to fail specific operations or specific transaction IDs.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{
    Account, Category, NewAccount, NewCategory, NewImportLog, NewTransactionRecord,
};
use crate::store::ImportStore;

/// Store operations that can be counted or failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    ListCategories,
    InsertCategories,
    ListAccounts,
    InsertAccount,
    ExistingExternalIds,
    InsertTransactions,
    InsertTransaction,
    AppendImportLog,
}

/// Instrumented store for pipeline tests
pub struct MockStore {
    pub db: Database,
    failing: HashSet<StoreOp>,
    rejected_ids: HashSet<String>,
    calls: Mutex<HashMap<StoreOp, usize>>,
}

impl MockStore {
    /// Create a store backed by a fresh temporary database
    pub fn new() -> Result<Self> {
        Ok(Self {
            db: Database::in_memory()?,
            failing: HashSet::new(),
            rejected_ids: HashSet::new(),
            calls: Mutex::new(HashMap::new()),
        })
    }

    /// Make every call to `op` fail
    pub fn failing(mut self, op: StoreOp) -> Self {
        self.failing.insert(op);
        self
    }

    /// Reject any write that includes this external ID
    pub fn rejecting_transaction(mut self, external_id: &str) -> Self {
        self.rejected_ids.insert(external_id.to_string());
        self
    }

    /// How many times `op` was called
    pub fn calls(&self, op: StoreOp) -> usize {
        self.calls
            .lock()
            .map(|calls| calls.get(&op).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    fn record(&self, op: StoreOp) -> Result<()> {
        if let Ok(mut calls) = self.calls.lock() {
            *calls.entry(op).or_insert(0) += 1;
        }
        if self.failing.contains(&op) {
            return Err(Error::Import(format!("simulated {:?} failure", op)));
        }
        Ok(())
    }

    fn check_rejected(&self, record: &NewTransactionRecord) -> Result<()> {
        if self.rejected_ids.contains(&record.external_id) {
            return Err(Error::Import(format!(
                "rejected transaction {}",
                record.external_id
            )));
        }
        Ok(())
    }
}

impl ImportStore for MockStore {
    fn list_categories(&self, owner: &str) -> Result<Vec<Category>> {
        self.record(StoreOp::ListCategories)?;
        self.db.list_categories(owner)
    }

    fn insert_categories(&self, owner: &str, categories: &[NewCategory]) -> Result<Vec<Category>> {
        self.record(StoreOp::InsertCategories)?;
        self.db.insert_categories(owner, categories)
    }

    fn list_accounts(&self, owner: &str) -> Result<Vec<Account>> {
        self.record(StoreOp::ListAccounts)?;
        self.db.list_accounts(owner)
    }

    fn insert_account(&self, account: &NewAccount) -> Result<i64> {
        self.record(StoreOp::InsertAccount)?;
        self.db.insert_account(account)
    }

    fn existing_external_ids(&self, external_ids: &[String]) -> Result<HashSet<String>> {
        self.record(StoreOp::ExistingExternalIds)?;
        self.db.existing_external_ids(external_ids)
    }

    fn insert_transactions(&self, records: &[NewTransactionRecord]) -> Result<usize> {
        self.record(StoreOp::InsertTransactions)?;
        for record in records {
            self.check_rejected(record)?;
        }
        self.db.insert_transactions(records)
    }

    fn insert_transaction(&self, record: &NewTransactionRecord) -> Result<i64> {
        self.record(StoreOp::InsertTransaction)?;
        self.check_rejected(record)?;
        self.db.insert_transaction(record)
    }

    fn append_import_log(&self, entry: &NewImportLog) -> Result<i64> {
        self.record(StoreOp::AppendImportLog)?;
        self.db.append_import_log(entry)
    }
}
