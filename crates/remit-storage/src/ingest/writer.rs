//! Batched insert pipeline.
//!
//! One call holds one connection under a relaxed durability profile,
//! commits every `batch_size` rows, and writes each batch as multi-row
//! `INSERT OR IGNORE` statements keyed by the unique uid index. A failed
//! batch is rolled back; batches committed before it stay.

use remit_core::config::{CollisionPolicy, SkipAccounting};
use remit_core::errors::StorageResult;
use remit_core::types::collections::FxHashSet;
use remit_core::types::records::Row;
use rusqlite::{Connection, Transaction};
use tracing::{debug, error, info, warn};

use super::plan::ColumnPlan;
use super::uid::generate_transaction_uid;
use super::{InsertReport, ProgressFn};
use crate::conflict::ConflictPolicy;
use crate::connection::{DurabilityProfile, RelaxedDurability};
use crate::schema::ddl::TRANSACTIONS_TABLE;
use crate::schema::sanitize::quote_ident;
use crate::schema::SchemaManager;

/// SQLITE_MAX_VARIABLE_NUMBER default since 3.32.
const MAX_BOUND_PARAMETERS: usize = 32_766;

/// `transaction_uid` and `processed_file_id` precede the data columns.
const FIXED_COLUMNS: usize = 2;

const OPTIMIZE_SQL: &str = "PRAGMA analysis_limit = 400; PRAGMA optimize;";

const EXISTS_SQL: &str = "SELECT 1 FROM edi_transactions WHERE transaction_uid = ?1";

/// Resolved settings for one call.
#[derive(Debug, Clone)]
pub struct WriteSettings {
    pub profile: DurabilityProfile,
    pub batch_size: usize,
    pub max_rows_per_statement: usize,
    pub skip_accounting: SkipAccounting,
    pub collision_policy: CollisionPolicy,
    pub progress_offset: usize,
    pub progress_total: Option<usize>,
}

#[derive(Debug, Default)]
struct BatchOutcome {
    inserted: usize,
    duplicates: usize,
}

/// Rows per multi-row INSERT, bounded by the engine's parameter limit.
pub fn rows_per_statement(data_columns: usize, max_rows: usize) -> usize {
    (MAX_BOUND_PARAMETERS / (FIXED_COLUMNS + data_columns))
        .min(max_rows)
        .max(1)
}

fn insert_sql(columns: &[String], rows: usize) -> String {
    let mut sql = format!(
        "{} INTO {TRANSACTIONS_TABLE} (transaction_uid, processed_file_id",
        ConflictPolicy::Ignore.insert_verb()
    );
    for column in columns {
        sql.push_str(", ");
        sql.push_str(&quote_ident(column));
    }
    sql.push_str(") VALUES ");

    let tuple = format!("({})", vec!["?"; FIXED_COLUMNS + columns.len()].join(", "));
    for i in 0..rows {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&tuple);
    }
    sql
}

/// Write `rows` (file id, record) through the batched pipeline.
///
/// Progress is reported after each commit as
/// `(progress_offset + rows_done, progress_total)`.
pub fn insert_rows(
    conn: &Connection,
    schema: &mut SchemaManager,
    rows: &[(i64, &Row)],
    settings: &WriteSettings,
    mut progress: Option<ProgressFn<'_>>,
) -> StorageResult<InsertReport> {
    let total = rows.len();
    let exact = settings.skip_accounting == SkipAccounting::Exact;
    let mut report = InsertReport {
        total,
        duplicates: exact.then_some(0),
        ..InsertReport::default()
    };
    if rows.is_empty() {
        return Ok(report);
    }

    let plan = ColumnPlan::build(rows.iter().map(|(_, row)| *row), schema, settings.collision_policy)?;

    let guard = RelaxedDurability::apply(conn, settings.profile)?;
    report.columns_added = schema.ensure_columns(conn, plan.field_names())?;

    let per_statement = rows_per_statement(plan.len(), settings.max_rows_per_statement);
    let full_sql = insert_sql(plan.columns(), per_statement);
    let progress_total = settings
        .progress_total
        .unwrap_or(settings.progress_offset + total);
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut done = 0;

    for batch in rows.chunks(settings.batch_size.max(1)) {
        let tx = conn.unchecked_transaction()?;
        let outcome = match write_batch(&tx, &plan, batch, per_statement, &full_sql, exact, &mut seen) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(
                    error = %e,
                    batch = report.batches_committed + 1,
                    committed_rows = done,
                    "batch insert failed, rolling back"
                );
                let _ = tx.rollback();
                return Err(e);
            }
        };
        tx.commit()?;

        report.batches_committed += 1;
        report.inserted += outcome.inserted;
        if let Some(duplicates) = report.duplicates.as_mut() {
            *duplicates += outcome.duplicates;
        }
        done += batch.len();
        debug!(
            batch = report.batches_committed,
            rows = batch.len(),
            inserted = outcome.inserted,
            "committed batch"
        );
        if let Some(cb) = progress.as_mut() {
            cb(settings.progress_offset + done, progress_total);
        }
    }

    schema.create_secondary_indexes(conn)?;
    if let Err(e) = conn.execute_batch(OPTIMIZE_SQL) {
        warn!(error = %e, "PRAGMA optimize failed");
    }
    drop(guard);

    report.skipped = total - report.inserted;
    info!(
        total,
        inserted = report.inserted,
        skipped = report.skipped,
        duplicates = ?report.duplicates,
        batches = report.batches_committed,
        columns_added = report.columns_added,
        profile = ?settings.profile,
        "ingest complete"
    );
    Ok(report)
}

fn write_batch(
    tx: &Transaction<'_>,
    plan: &ColumnPlan,
    batch: &[(i64, &Row)],
    per_statement: usize,
    full_sql: &str,
    exact: bool,
    seen: &mut FxHashSet<String>,
) -> StorageResult<BatchOutcome> {
    let mut outcome = BatchOutcome::default();

    let mut pending: Vec<(String, i64, &Row)> = Vec::with_capacity(batch.len());
    for &(file_id, row) in batch {
        let uid = generate_transaction_uid(row);
        if exact {
            let repeated = !seen.insert(uid.clone());
            if repeated || tx.prepare_cached(EXISTS_SQL)?.exists([uid.as_str()])? {
                outcome.duplicates += 1;
                continue;
            }
        }
        pending.push((uid, file_id, row));
    }

    for chunk in pending.chunks(per_statement) {
        let partial_sql;
        let sql = if chunk.len() == per_statement {
            full_sql
        } else {
            partial_sql = insert_sql(plan.columns(), chunk.len());
            partial_sql.as_str()
        };

        let mut stmt = tx.prepare_cached(sql)?;
        let mut idx = 1;
        for (uid, file_id, row) in chunk {
            stmt.raw_bind_parameter(idx, uid.as_str())?;
            stmt.raw_bind_parameter(idx + 1, *file_id)?;
            idx += FIXED_COLUMNS;
            for value in plan.project(row) {
                stmt.raw_bind_parameter(idx, value)?;
                idx += 1;
            }
        }
        outcome.inserted += stmt.raw_execute()?;
    }

    Ok(outcome)
}
