//! Whole-grid parsing

use tracing::debug;

use super::decode::decode;
use super::normalize::{normalize, AmountPolicy};
use crate::models::{ImportError, ImportWarning, NormalizedTransaction};

/// Parsed transactions plus per-row problems
#[derive(Debug, Clone, Default)]
pub struct ParsedBatch {
    pub transactions: Vec<NormalizedTransaction>,
    pub errors: Vec<ImportError>,
    pub warnings: Vec<ImportWarning>,
}

/// Parse every data row of a grid
///
/// Row 0 is the header. Problems are reported against the 1-indexed sheet row
/// (the header being row 1), so data row `i` reports as row `i + 1`.
pub fn parse_batch<R: AsRef<[String]>>(rows: &[R], policy: AmountPolicy) -> ParsedBatch {
    let mut batch = ParsedBatch::default();

    for (idx, cells) in rows.iter().enumerate().skip(1) {
        let sheet_row = idx + 1;
        match normalize(&decode(cells.as_ref()), policy) {
            Ok(Some(normalized)) => {
                if let Some(message) = normalized.warning {
                    batch.warnings.push(ImportWarning {
                        row: sheet_row,
                        transaction_id: Some(normalized.transaction.external_id.clone()),
                        message,
                    });
                }
                batch.transactions.push(normalized.transaction);
            }
            Ok(None) => {}
            Err(e) => batch.errors.push(ImportError::at_row(sheet_row, e.to_string())),
        }
    }

    debug!(
        "Parsed {} rows: {} transactions, {} errors, {} warnings",
        rows.len().saturating_sub(1),
        batch.transactions.len(),
        batch.errors.len(),
        batch.warnings.len()
    );

    batch
}
