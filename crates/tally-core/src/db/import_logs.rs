//! Import log operations

use rusqlite::{params, Row};

use super::{parse_datetime, Database, DATETIME_FORMAT};
use crate::error::Result;
use crate::models::{ImportLogEntry, ImportStatus, NewImportLog};

fn import_log_from_row(row: &Row<'_>) -> rusqlite::Result<ImportLogEntry> {
    let status_str: String = row.get(5)?;
    let completed_at_str: String = row.get(7)?;

    Ok(ImportLogEntry {
        id: row.get(0)?,
        owner: row.get(1)?,
        source: row.get(2)?,
        records_processed: row.get(3)?,
        records_imported: row.get(4)?,
        status: status_str.parse().unwrap_or(ImportStatus::Failed),
        error_message: row.get(6)?,
        completed_at: parse_datetime(&completed_at_str),
    })
}

impl Database {
    /// Append an entry to the import log
    pub fn append_import_log(&self, entry: &NewImportLog) -> Result<i64> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO import_logs (owner, source, records_processed, records_imported, status, error_message, completed_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                entry.owner,
                entry.source,
                entry.records_processed,
                entry.records_imported,
                entry.status.as_str(),
                entry.error_message,
                entry.completed_at.format(DATETIME_FORMAT).to_string(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// List an owner's import log, newest first
    pub fn list_import_logs(&self, owner: &str, limit: i64, offset: i64) -> Result<Vec<ImportLogEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, owner, source, records_processed, records_imported, status, error_message, completed_at
            FROM import_logs
            WHERE owner = ?
            ORDER BY completed_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )?;

        let entries = stmt
            .query_map(params![owner, limit, offset], import_log_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Count an owner's import log entries
    pub fn count_import_logs(&self, owner: &str) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM import_logs WHERE owner = ?",
            params![owner],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
