//! Reading a spreadsheet grid from a CSV export

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Result;

/// Read every CSV record as a row of cells
///
/// The header is returned as the first row like any other; rows may differ in length.
pub fn read_grid<R: Read>(reader: R) -> Result<Vec<Vec<String>>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    // Excel and Sheets exports may start with a byte order mark
    if let Some(first) = rows.first_mut().and_then(|row| row.first_mut()) {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.to_string();
        }
    }

    Ok(rows)
}

/// Read a CSV export from disk
pub fn read_grid_from_path(path: &Path) -> Result<Vec<Vec<String>>> {
    read_grid(File::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_grid_keeps_header_and_ragged_rows() {
        let data = "Transaction ID,Date,Time\ntx_1,16/01/2026\n\"tx_2\",\"17/01/2026\",\"10:00:00\",extra\n";
        let rows = read_grid(data.as_bytes()).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["Transaction ID", "Date", "Time"]);
        assert_eq!(rows[1].len(), 2);
        assert_eq!(rows[2][3], "extra");
    }

    #[test]
    fn test_read_grid_strips_bom_and_keeps_commas_in_quotes() {
        let data = "\u{feff}Transaction ID,Amount\ntx_1,\"1,234.56\"\n";
        let rows = read_grid(data.as_bytes()).unwrap();

        assert_eq!(rows[0][0], "Transaction ID");
        assert_eq!(rows[1][1], "1,234.56");
    }

    #[test]
    fn test_read_grid_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Transaction ID,Date").unwrap();
        writeln!(file, "tx_1,16/01/2026").unwrap();

        let rows = read_grid_from_path(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(read_grid_from_path(Path::new("/nonexistent/export.csv")).is_err());
    }
}
