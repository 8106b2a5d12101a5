//! Detecting transactions that were imported before

use std::collections::HashSet;

use crate::error::Result;
use crate::store::ImportStore;

/// Return the candidate IDs that already exist in the store
///
/// An empty candidate list never reaches the store.
pub fn existing_ids<S: ImportStore + ?Sized>(
    store: &S,
    candidates: &[String],
) -> Result<HashSet<String>> {
    if candidates.is_empty() {
        return Ok(HashSet::new());
    }
    store.existing_external_ids(candidates)
}
