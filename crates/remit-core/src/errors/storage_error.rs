//! Storage-layer errors for SQLite operations.

use rusqlite::ErrorCode;

use super::error_code::{self, RemitErrorCode};

/// Errors that can occur in the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("Migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("Database busy (another operation in progress)")]
    DbBusy,

    #[error("Database corrupt: {details}")]
    DbCorrupt { details: String },

    #[error("Disk full")]
    DiskFull,

    #[error("File already registered: {file_hash}")]
    DuplicateFile { file_hash: String },

    #[error("Fields {first:?} and {second:?} both map to column {column}")]
    ColumnCollision {
        column: String,
        first: String,
        second: String,
    },

    #[error("Field {field:?} maps to reserved column {column}")]
    ReservedColumn { field: String, column: String },

    #[error("Unknown column: {column}")]
    UnknownColumn { column: String },

    #[error("Result stream already consumed")]
    StreamConsumed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Classify by SQLite primary result code. Anything without a dedicated
/// variant keeps the engine's message.
impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        match e.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => Self::DbBusy,
            Some(ErrorCode::DiskFull) => Self::DiskFull,
            Some(ErrorCode::DatabaseCorrupt) | Some(ErrorCode::NotADatabase) => Self::DbCorrupt {
                details: e.to_string(),
            },
            _ => Self::SqliteError {
                message: e.to_string(),
            },
        }
    }
}

impl RemitErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DbBusy => error_code::DB_BUSY,
            Self::DbCorrupt { .. } => error_code::DB_CORRUPT,
            Self::DiskFull => error_code::DISK_FULL,
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::DuplicateFile { .. } => error_code::DUPLICATE_FILE,
            Self::ColumnCollision { .. } => error_code::COLUMN_COLLISION,
            Self::ReservedColumn { .. } => error_code::RESERVED_COLUMN,
            Self::UnknownColumn { .. } => error_code::UNKNOWN_COLUMN,
            Self::StreamConsumed => error_code::STREAM_CONSUMED,
            Self::Io(_) => error_code::IO_ERROR,
            Self::Csv(_) => error_code::EXPORT_FAILED,
            _ => error_code::STORAGE_ERROR,
        }
    }
}
