//! # remit-core
//!
//! Foundation crate for the remit store.
//! Defines row types, the 835 field catalog, errors, config, and tracing setup.
//! `remit-storage` depends on this.

pub mod catalog;
pub mod config;
pub mod errors;
pub mod tracing;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::StoreConfig;
pub use errors::error_code::RemitErrorCode;
pub use errors::{ConfigError, StorageError};
pub use types::collections::{FxHashMap, FxHashSet};
pub use types::records::{FileRow, NewProcessedFile, ProcessedFile, Row};
