//! Base tables, fixed indexes, and the schema version marker.

use remit_core::errors::{StorageError, StorageResult};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

/// Version 2: one TEXT column per field (no JSON blob).
pub const SCHEMA_VERSION: u32 = 2;

pub const TRANSACTIONS_TABLE: &str = "edi_transactions";

pub const BASE_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    description TEXT
);

CREATE TABLE IF NOT EXISTS processed_files (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    filename TEXT NOT NULL,
    file_hash TEXT NOT NULL UNIQUE,
    interchange_control_number TEXT,
    file_size_bytes INTEGER,
    record_count INTEGER,
    processed_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    source_folder TEXT
);

-- Data columns are added with ALTER TABLE as fields appear.
CREATE TABLE IF NOT EXISTS edi_transactions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    transaction_uid TEXT NOT NULL UNIQUE,
    processed_file_id INTEGER,
    imported_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (processed_file_id) REFERENCES processed_files(id)
);

-- Append-only: sanitized column -> display name that introduced it.
-- source_name is NULL for columns found on disk without a record.
CREATE TABLE IF NOT EXISTS column_registry (
    column_name TEXT PRIMARY KEY COLLATE NOCASE,
    source_name TEXT,
    added_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_file_hash ON processed_files(file_hash);
CREATE UNIQUE INDEX IF NOT EXISTS idx_transaction_uid ON edi_transactions(transaction_uid);
CREATE INDEX IF NOT EXISTS idx_processed_file_id ON edi_transactions(processed_file_id);
"#;

/// Create the base tables if absent and stamp the version marker.
/// Idempotent. Refuses databases written by a newer schema.
pub fn create_base_schema(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(BASE_SCHEMA_SQL)?;

    let existing = current_version(conn)?;
    match existing {
        Some(v) if v > SCHEMA_VERSION => {
            return Err(StorageError::MigrationFailed {
                version: v,
                message: format!("database schema v{v} is newer than supported v{SCHEMA_VERSION}"),
            });
        }
        Some(v) => debug!(version = v, "schema version marker present"),
        None => {
            conn.execute(
                "INSERT INTO schema_version (version, description) VALUES (?1, ?2)",
                params![SCHEMA_VERSION, "full column storage"],
            )?;
        }
    }
    Ok(())
}

/// Highest recorded schema version, if any.
pub fn current_version(conn: &Connection) -> StorageResult<Option<u32>> {
    let version = conn
        .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get::<_, Option<u32>>(0)
        })
        .optional()?
        .flatten();
    Ok(version)
}

/// Column names of the transaction table in declaration order.
pub fn table_columns(conn: &Connection) -> StorageResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
    let names = stmt
        .query_map([TRANSACTIONS_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}
