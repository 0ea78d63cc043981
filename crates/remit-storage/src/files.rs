//! File registry: content-hash dedup and provenance for ingested files.
//!
//! The dedup key is the SHA-256 of the raw bytes, so a renamed or re-copied
//! file is still recognised. The store never parses files; callers check
//! [`FileCheck::is_processed`] before handing rows to the ingest path.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use remit_core::errors::{StorageError, StorageResult};
use remit_core::types::records::{NewProcessedFile, ProcessedFile};
use rusqlite::{ffi, params, Connection, OptionalExtension, Row as SqlRow, Transaction, TransactionBehavior};
use sha2::{Digest, Sha256};
use tracing::{error, info};

use crate::conflict::ConflictPolicy;

/// Outcome of a dedup lookup. Carries the hash so the caller can register
/// the file afterwards without reading it twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCheck {
    pub file_hash: String,
    pub prior: Option<ProcessedFile>,
}

impl FileCheck {
    pub fn is_processed(&self) -> bool {
        self.prior.is_some()
    }
}

/// SHA-256 hex digest of a file, streamed in `chunk_size` reads.
pub fn compute_file_hash(path: &Path, chunk_size: usize) -> StorageResult<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; chunk_size.max(1)];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

const SELECT_FILE_COLUMNS: &str = "SELECT id, filename, file_hash, interchange_control_number,
        file_size_bytes, record_count, processed_at, source_folder
 FROM processed_files";

fn map_file_row(row: &SqlRow<'_>) -> rusqlite::Result<ProcessedFile> {
    Ok(ProcessedFile {
        id: row.get(0)?,
        filename: row.get(1)?,
        file_hash: row.get(2)?,
        interchange_control_number: row.get(3)?,
        file_size_bytes: row.get(4)?,
        record_count: row.get(5)?,
        processed_at: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        source_folder: row.get(7)?,
    })
}

/// Look up a processed file by content hash.
pub fn find_by_hash(conn: &Connection, file_hash: &str) -> StorageResult<Option<ProcessedFile>> {
    let mut stmt = conn.prepare_cached(&format!("{SELECT_FILE_COLUMNS} WHERE file_hash = ?1"))?;
    let found = stmt.query_row([file_hash], map_file_row).optional()?;
    Ok(found)
}

/// All processed files, newest first.
pub fn list_processed_files(conn: &Connection) -> StorageResult<Vec<ProcessedFile>> {
    let mut stmt =
        conn.prepare(&format!("{SELECT_FILE_COLUMNS} ORDER BY processed_at DESC, id DESC"))?;
    let files = stmt
        .query_map([], map_file_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(files)
}

fn insert_sql() -> String {
    format!(
        "{} INTO processed_files
         (filename, file_hash, interchange_control_number, file_size_bytes,
          record_count, source_folder)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        ConflictPolicy::Abort.insert_verb()
    )
}

fn insert_one(conn: &Connection, file: &NewProcessedFile) -> StorageResult<i64> {
    let mut stmt = conn.prepare_cached(&insert_sql())?;
    stmt.execute(params![
        file.filename,
        file.file_hash,
        file.interchange_control_number,
        file.file_size_bytes,
        file.record_count,
        file.source_folder,
    ])
    .map_err(|e| classify_insert_error(e, &file.file_hash))?;
    Ok(conn.last_insert_rowid())
}

/// A unique violation on `file_hash` means the caller skipped the dedup check.
fn classify_insert_error(e: rusqlite::Error, file_hash: &str) -> StorageError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _) if err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE => {
            StorageError::DuplicateFile {
                file_hash: file_hash.to_string(),
            }
        }
        _ => e.into(),
    }
}

/// Register one processed file. Returns its id.
pub fn register_processed_file(conn: &Connection, file: &NewProcessedFile) -> StorageResult<i64> {
    insert_one(conn, file)
}

/// Register many files in one IMMEDIATE transaction. Progress is reported
/// every `progress_interval` files and once at the end. Any failure rolls
/// the whole batch back. Returns file hash → id.
pub fn register_processed_files_bulk(
    conn: &Connection,
    files: &[NewProcessedFile],
    progress_interval: usize,
    mut progress: Option<&mut dyn FnMut(usize, usize)>,
) -> StorageResult<BTreeMap<String, i64>> {
    if files.is_empty() {
        return Ok(BTreeMap::new());
    }

    let total = files.len();
    let interval = progress_interval.max(1);
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let mut ids = BTreeMap::new();

    for (idx, file) in files.iter().enumerate() {
        match insert_one(&tx, file) {
            Ok(id) => {
                ids.insert(file.file_hash.clone(), id);
            }
            Err(e) => {
                error!(error = %e, filename = %file.filename, "bulk file registration failed, rolling back");
                let _ = tx.rollback();
                return Err(e);
            }
        }
        let done = idx + 1;
        if done % interval == 0 && done != total {
            if let Some(cb) = progress.as_mut() {
                cb(done, total);
            }
        }
    }

    tx.commit()?;
    if let Some(cb) = progress.as_mut() {
        cb(total, total);
    }
    info!(files = total, "bulk registered files in one transaction");
    Ok(ids)
}
