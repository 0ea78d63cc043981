//! Error types for the remit store.
//! One enum per subsystem, each mapped to a stable error code.

pub mod config_error;
pub mod error_code;
pub mod storage_error;

pub use config_error::ConfigError;
pub use error_code::RemitErrorCode;
pub use storage_error::StorageError;

/// Convenience alias used across the storage crate.
pub type StorageResult<T> = Result<T, StorageError>;
