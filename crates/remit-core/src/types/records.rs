//! Record types crossing the store boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One flattened 835 record: display field name → text value.
///
/// Ordered so that projections and exports are deterministic.
pub type Row = BTreeMap<String, String>;

/// A row tagged with the processed file it belongs to. Used by the backfill
/// path, which ingests many files' rows in one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRow {
    pub file_id: i64,
    pub fields: Row,
}

impl FileRow {
    pub fn new(file_id: i64, fields: Row) -> Self {
        Self { file_id, fields }
    }
}

/// Metadata for a file about to be registered as processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProcessedFile {
    pub filename: String,
    /// SHA-256 hex digest of the raw file bytes.
    pub file_hash: String,
    pub interchange_control_number: String,
    pub file_size_bytes: i64,
    pub record_count: i64,
    pub source_folder: String,
}

/// A previously registered file, as read back for dedup and provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedFile {
    pub id: i64,
    pub filename: String,
    pub file_hash: String,
    pub interchange_control_number: Option<String>,
    pub file_size_bytes: Option<i64>,
    pub record_count: Option<i64>,
    /// `YYYY-MM-DD HH:MM:SS` (UTC), as stamped by SQLite.
    pub processed_at: String,
    pub source_folder: Option<String>,
}
