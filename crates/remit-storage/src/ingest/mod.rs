//! Transaction ingest: identity generation, column planning, and the batched
//! insert pipeline.

pub mod plan;
pub mod uid;
pub mod writer;

use serde::Serialize;

pub use plan::ColumnPlan;
pub use uid::generate_transaction_uid;

/// Progress callback: `(rows_done, rows_total)`.
pub type ProgressFn<'a> = &'a mut dyn FnMut(usize, usize);

/// Per-call overrides for [`crate::RemitStore::insert_transactions_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertOptions {
    /// Rows per commit. `None` uses the configured batch size.
    pub batch_size: Option<usize>,
    /// Added to every progress report, for callers running several inserts
    /// against one run-wide counter.
    pub progress_offset: usize,
    /// Reported as the second progress argument. `None` reports
    /// `progress_offset + rows.len()`.
    pub progress_total: Option<usize>,
}

/// Outcome of one insert call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InsertReport {
    /// Rows handed to the call.
    pub total: usize,
    /// Rows actually written.
    pub inserted: usize,
    /// `total - inserted`.
    pub skipped: usize,
    /// Rows whose uid was already stored or appeared earlier in the call.
    /// Only counted under exact skip accounting.
    pub duplicates: Option<usize>,
    pub batches_committed: usize,
    pub columns_added: usize,
}
