//! Positional decoding of spreadsheet rows
//!
//! The Monzo export has a fixed column layout (A through P). Decoding never
//! fails: cells past the end of a short row read as empty strings.

/// One spreadsheet row with each column named
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedRow {
    pub transaction_id: String,
    pub date: String,
    pub time: String,
    pub kind: String,
    pub name: String,
    pub emoji: String,
    pub category: String,
    pub amount: String,
    pub currency: String,
    pub local_amount: String,
    pub local_currency: String,
    pub notes_and_tags: String,
    pub address: String,
    pub receipt: String,
    pub description: String,
    pub category_split: String,
}

/// Number of significant columns in a row
pub const COLUMN_COUNT: usize = 16;

/// Decode raw cells into named fields
pub fn decode<S: AsRef<str>>(cells: &[S]) -> DecodedRow {
    let cell = |idx: usize| {
        cells
            .get(idx)
            .map(|c| c.as_ref().to_string())
            .unwrap_or_default()
    };

    DecodedRow {
        transaction_id: cell(0),
        date: cell(1),
        time: cell(2),
        kind: cell(3),
        name: cell(4),
        emoji: cell(5),
        category: cell(6),
        amount: cell(7),
        currency: cell(8),
        local_amount: cell(9),
        local_currency: cell(10),
        notes_and_tags: cell(11),
        address: cell(12),
        receipt: cell(13),
        description: cell(14),
        category_split: cell(15),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_row() {
        let cells: Vec<String> = (0..COLUMN_COUNT).map(|i| format!("c{}", i)).collect();
        let row = decode(&cells);
        assert_eq!(row.transaction_id, "c0");
        assert_eq!(row.kind, "c3");
        assert_eq!(row.amount, "c7");
        assert_eq!(row.address, "c12");
        assert_eq!(row.category_split, "c15");
    }

    #[test]
    fn test_decode_short_row_pads_with_empty() {
        let row = decode(&["tx_1", "16/01/2026"]);
        assert_eq!(row.transaction_id, "tx_1");
        assert_eq!(row.date, "16/01/2026");
        assert_eq!(row.time, "");
        assert_eq!(row.description, "");
    }

    #[test]
    fn test_decode_ignores_extra_cells() {
        let mut cells = vec![""; COLUMN_COUNT];
        cells.push("overflow");
        assert_eq!(decode(&cells), DecodedRow::default());
    }
}
