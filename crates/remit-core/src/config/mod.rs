//! Store configuration, loadable from TOML.
//!
//! Every section uses `Option` fields plus `effective_*` accessors so a
//! partial file (or none at all) falls back to the tuned defaults.

pub mod connection_config;
pub mod ingest_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

pub use connection_config::ConnectionConfig;
pub use ingest_config::{CollisionPolicy, FilesConfig, IngestConfig, SchemaConfig, SkipAccounting};

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    pub connection: ConnectionConfig,
    pub ingest: IngestConfig,
    pub files: FilesConfig,
    pub schema: SchemaConfig,
}

impl StoreConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Reject values that would make the ingest pipeline degenerate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("ingest.batch_size", self.ingest.batch_size),
            ("ingest.bulk_batch_size", self.ingest.bulk_batch_size),
            ("ingest.max_rows_per_statement", self.ingest.max_rows_per_statement),
            ("files.hash_chunk_size", self.files.hash_chunk_size),
            ("files.progress_interval", self.files.progress_interval),
        ];
        for (field, value) in positive {
            if value == Some(0) {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: "must be greater than zero".to_string(),
                });
            }
        }
        Ok(())
    }
}
