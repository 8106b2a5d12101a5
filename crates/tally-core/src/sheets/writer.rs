//! Persisting new transactions with batch-then-fallback writes

use std::collections::HashMap;

use tracing::{debug, warn};

use super::dedupe::existing_ids;
use crate::error::Result;
use crate::models::{ImportError, NewTransactionRecord, NormalizedTransaction};
use crate::store::ImportStore;

/// Records per atomic batch insert
pub const IMPORT_BATCH_SIZE: usize = 100;

/// An item that could not be written even on its own
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TieredFailure {
    /// Position of the item in the input slice
    pub index: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TieredOutcome {
    pub written: usize,
    pub failures: Vec<TieredFailure>,
    /// Batches whose bulk write failed and were retried item by item
    pub fallback_batches: usize,
}

/// Write `items` in chunks with `bulk`, retrying a failed chunk item by item with `single`
///
/// A failing item never stops later items or later chunks.
pub fn write_tiered<T, B, S>(
    items: &[T],
    batch_size: usize,
    mut bulk: B,
    mut single: S,
) -> TieredOutcome
where
    B: FnMut(&[T]) -> Result<()>,
    S: FnMut(&T) -> Result<()>,
{
    let batch_size = batch_size.max(1);
    let mut outcome = TieredOutcome::default();

    for (batch_idx, batch) in items.chunks(batch_size).enumerate() {
        let offset = batch_idx * batch_size;

        match bulk(batch) {
            Ok(()) => outcome.written += batch.len(),
            Err(e) => {
                warn!(
                    "Batch insert of {} records failed, retrying individually: {}",
                    batch.len(),
                    e
                );
                outcome.fallback_batches += 1;

                for (i, item) in batch.iter().enumerate() {
                    match single(item) {
                        Ok(()) => outcome.written += 1,
                        Err(e) => outcome.failures.push(TieredFailure {
                            index: offset + i,
                            message: e.to_string(),
                        }),
                    }
                }
            }
        }
    }

    outcome
}

/// Counts and per-record errors from writing one import
#[derive(Debug, Clone, Default)]
pub struct WriteOutcome {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<ImportError>,
}

/// Persist the transactions that are not already stored
pub fn write<S: ImportStore + ?Sized>(
    store: &S,
    account_id: i64,
    transactions: &[NormalizedTransaction],
    category_map: &HashMap<String, i64>,
) -> Result<WriteOutcome> {
    let candidates: Vec<String> = transactions
        .iter()
        .map(|t| t.external_id.clone())
        .collect();
    let existing = existing_ids(store, &candidates)?;

    let records: Vec<NewTransactionRecord> = transactions
        .iter()
        .filter(|t| !existing.contains(&t.external_id))
        .map(|t| {
            let category_id = category_map.get(&t.external_category).copied();
            NewTransactionRecord::from_normalized(account_id, t, category_id)
        })
        .collect();
    let skipped = transactions.len() - records.len();

    if records.is_empty() {
        debug!("All {} transactions already imported", skipped);
        return Ok(WriteOutcome {
            skipped,
            ..Default::default()
        });
    }

    let tiered = write_tiered(
        &records,
        IMPORT_BATCH_SIZE,
        |batch| store.insert_transactions(batch).map(|_| ()),
        |record| store.insert_transaction(record).map(|_| ()),
    );

    let errors = tiered
        .failures
        .into_iter()
        .map(|f| ImportError::for_transaction(records[f.index].external_id.clone(), f.message))
        .collect();

    Ok(WriteOutcome {
        imported: tiered.written,
        skipped,
        errors,
    })
}
