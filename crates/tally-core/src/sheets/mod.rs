//! Monzo spreadsheet ingestion
//!
//! Components, leaves first:
//! - `decode` - raw cells to named columns
//! - `normalize` - one decoded row to a typed transaction (or a skip)
//! - `parse` - a whole grid, collecting per-row errors
//! - `reconcile` - Monzo category labels to category IDs
//! - `dedupe` - which transactions were imported before
//! - `writer` - batched inserts with per-record fallback
//! - `pipeline` - sequencing, account resolution and the import log
//!
//! `grid` reads a CSV export into the same row shape the Sheets API returns.

mod decode;
mod dedupe;
mod grid;
mod normalize;
mod parse;
mod pipeline;
mod reconcile;
mod writer;

pub use decode::{decode, DecodedRow, COLUMN_COUNT};
pub use dedupe::existing_ids;
pub use grid::{read_grid, read_grid_from_path};
pub use normalize::{
    classify_kind, normalize, parse_amount, parse_datetime, AmountPolicy, Normalized, RowError,
    HEADER_LABEL,
};
pub use parse::{parse_batch, ParsedBatch};
pub use pipeline::{
    import_batch, resolve_account, ImportOptions, DEFAULT_ACCOUNT_NAME, DEFAULT_SHEET_NAME,
    IMPORT_SOURCE,
};
pub use reconcile::{category_style, reconcile};
pub use writer::{
    write, write_tiered, TieredFailure, TieredOutcome, WriteOutcome, IMPORT_BATCH_SIZE,
};
