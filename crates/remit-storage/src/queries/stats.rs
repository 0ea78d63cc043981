//! Database statistics.

use std::path::{Path, PathBuf};

use remit_core::errors::StorageResult;
use rusqlite::Connection;
use serde::Serialize;

use crate::schema::ddl::table_columns;

/// Snapshot of what the store holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub file_count: usize,
    pub transaction_count: usize,
    /// Sum of `record_count` over processed files.
    pub total_records_imported: i64,
    pub column_count: usize,
    pub first_import: Option<String>,
    pub last_import: Option<String>,
    pub database_path: PathBuf,
    /// Main database file plus any write-ahead log.
    pub database_size_bytes: u64,
}

impl Statistics {
    /// Size in MiB, rounded to two decimals.
    pub fn database_size_mb(&self) -> f64 {
        let mb = self.database_size_bytes as f64 / (1024.0 * 1024.0);
        (mb * 100.0).round() / 100.0
    }
}

pub fn collect_statistics(conn: &Connection, db_path: &Path) -> StorageResult<Statistics> {
    let file_count: i64 = conn.query_row("SELECT COUNT(*) FROM processed_files", [], |row| row.get(0))?;
    let transaction_count: i64 =
        conn.query_row("SELECT COUNT(*) FROM edi_transactions", [], |row| row.get(0))?;
    let total_records_imported: i64 = conn.query_row(
        "SELECT COALESCE(SUM(record_count), 0) FROM processed_files",
        [],
        |row| row.get(0),
    )?;
    let (first_import, last_import): (Option<String>, Option<String>) = conn.query_row(
        "SELECT MIN(processed_at), MAX(processed_at) FROM processed_files",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    let column_count = table_columns(conn)?.len();

    Ok(Statistics {
        file_count: file_count.max(0) as usize,
        transaction_count: transaction_count.max(0) as usize,
        total_records_imported,
        column_count,
        first_import,
        last_import,
        database_path: db_path.to_path_buf(),
        database_size_bytes: on_disk_size(db_path),
    })
}

/// Bytes used by the database file and its `-wal` sibling. Missing files count as 0.
pub fn on_disk_size(db_path: &Path) -> u64 {
    let mut wal = db_path.as_os_str().to_owned();
    wal.push("-wal");
    [db_path.to_path_buf(), PathBuf::from(wal)]
        .iter()
        .filter_map(|p| std::fs::metadata(p).ok())
        .map(|m| m.len())
        .sum()
}
