//! Stable error codes surfaced to callers (reporting layer, logs).

pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const DB_BUSY: &str = "DB_BUSY";
pub const DB_CORRUPT: &str = "DB_CORRUPT";
pub const DISK_FULL: &str = "DISK_FULL";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const DUPLICATE_FILE: &str = "DUPLICATE_FILE";
pub const COLUMN_COLLISION: &str = "COLUMN_COLLISION";
pub const RESERVED_COLUMN: &str = "RESERVED_COLUMN";
pub const UNKNOWN_COLUMN: &str = "UNKNOWN_COLUMN";
pub const STREAM_CONSUMED: &str = "STREAM_CONSUMED";
pub const IO_ERROR: &str = "IO_ERROR";
pub const EXPORT_FAILED: &str = "EXPORT_FAILED";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const CONFIG_PARSE_ERROR: &str = "CONFIG_PARSE_ERROR";

/// Every error enum in the workspace exposes a machine-readable code.
pub trait RemitErrorCode {
    fn error_code(&self) -> &'static str;
}
