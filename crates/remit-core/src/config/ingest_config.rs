//! Ingest, file registry, and schema configuration.

use serde::{Deserialize, Serialize};

/// How the insert pipeline accounts for rows it did not write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SkipAccounting {
    /// `skipped = total - inserted`. Duplicates and any other ignored
    /// conflict are indistinguishable.
    #[default]
    Approximate,
    /// Per-row existence check before each insert; duplicates are counted
    /// separately at a throughput cost.
    Exact,
}

/// What to do when distinct display names sanitize to the same column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Fail the insert before anything is written.
    #[default]
    Reject,
    /// Share the column; the first present name (sorted order) supplies the value.
    Merge,
}

/// Transaction insert pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct IngestConfig {
    /// Rows per commit on the incremental path. Default: 100_000.
    pub batch_size: Option<usize>,
    /// Rows per commit on the non-durable backfill path. Default: 50_000.
    pub bulk_batch_size: Option<usize>,
    /// Upper bound on rows bound into one multi-row INSERT. The effective
    /// value is further capped by SQLite's bound-parameter limit. Default: 500.
    pub max_rows_per_statement: Option<usize>,
    pub skip_accounting: Option<SkipAccounting>,
    pub collision_policy: Option<CollisionPolicy>,
}

impl IngestConfig {
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.unwrap_or(100_000)
    }

    pub fn effective_bulk_batch_size(&self) -> usize {
        self.bulk_batch_size.unwrap_or(50_000)
    }

    pub fn effective_max_rows_per_statement(&self) -> usize {
        self.max_rows_per_statement.unwrap_or(500)
    }

    pub fn effective_skip_accounting(&self) -> SkipAccounting {
        self.skip_accounting.unwrap_or_default()
    }

    pub fn effective_collision_policy(&self) -> CollisionPolicy {
        self.collision_policy.unwrap_or_default()
    }
}

/// File registry settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct FilesConfig {
    /// Read size when hashing file content. Default: 8192 bytes.
    pub hash_chunk_size: Option<usize>,
    /// Bulk registration reports progress every N files. Default: 500.
    pub progress_interval: Option<usize>,
}

impl FilesConfig {
    pub fn effective_hash_chunk_size(&self) -> usize {
        self.hash_chunk_size.unwrap_or(8192)
    }

    pub fn effective_progress_interval(&self) -> usize {
        self.progress_interval.unwrap_or(500)
    }
}

/// Schema manager settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SchemaConfig {
    /// Create every catalog column at open time instead of on first ingest.
    /// Default: true.
    pub precreate_catalog: Option<bool>,
}

impl SchemaConfig {
    pub fn effective_precreate_catalog(&self) -> bool {
        self.precreate_catalog.unwrap_or(true)
    }
}
