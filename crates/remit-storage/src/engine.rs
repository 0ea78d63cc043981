//! `RemitStore`: the storage engine for one database file.
//!
//! Owns the per-database state (configuration and the schema manager's
//! column cache). Every operation opens its own connection and drops it on
//! return. Ingest takes `&mut self` because it extends the column set and
//! may build the secondary indexes; that is the single-writer rule.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use remit_core::config::StoreConfig;
use remit_core::errors::StorageResult;
use remit_core::types::records::{FileRow, NewProcessedFile, ProcessedFile, Row};
use rusqlite::Connection;
use tracing::info;

use crate::connection::{open_connection, DurabilityProfile};
use crate::files::{self, FileCheck};
use crate::ingest::writer::{insert_rows, WriteSettings};
use crate::ingest::{InsertOptions, InsertReport, ProgressFn};
use crate::queries::stats::{collect_statistics, Statistics};
use crate::queries::stream::{StreamItem, TransactionStream};
use crate::queries::{export, maintenance, transactions, QueryParams};
use crate::schema::ddl::table_columns;
use crate::schema::SchemaManager;

pub struct RemitStore {
    path: PathBuf,
    config: StoreConfig,
    schema: SchemaManager,
}

impl RemitStore {
    /// Open (creating if needed) the database at `path` with default settings.
    pub fn open(path: &Path) -> StorageResult<Self> {
        Self::open_with_config(path, StoreConfig::default())
    }

    /// Open with explicit settings. Creates the parent directory, the base
    /// tables and, unless disabled, every catalog column.
    pub fn open_with_config(path: &Path, config: StoreConfig) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = open_connection(path, &config.connection)?;
        let schema = SchemaManager::initialize(&conn, config.schema.effective_precreate_catalog())?;
        info!(
            path = %path.display(),
            columns = schema.column_count(),
            "opened remit store"
        );

        Ok(Self {
            path: path.to_path_buf(),
            config,
            schema,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn schema(&self) -> &SchemaManager {
        &self.schema
    }

    /// A fresh connection with the store's busy timeout and baseline pragmas.
    pub fn connect(&self) -> StorageResult<Connection> {
        open_connection(&self.path, &self.config.connection)
    }

    /// Raw access for operations not covered by a store method.
    pub fn with_connection<F, T>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&Connection) -> StorageResult<T>,
    {
        let conn = self.connect()?;
        f(&conn)
    }

    /// Re-read the column set from disk, e.g. after another process
    /// extended the table.
    pub fn reload_schema(&mut self) -> StorageResult<()> {
        let conn = self.connect()?;
        self.schema.reload(&conn)
    }

    // ── File registry ──────────────────────────────────────────────────

    pub fn compute_file_hash(&self, path: &Path) -> StorageResult<String> {
        files::compute_file_hash(path, self.config.files.effective_hash_chunk_size())
    }

    /// Hash `path` and look the digest up.
    pub fn is_file_processed(&self, path: &Path) -> StorageResult<FileCheck> {
        let file_hash = self.compute_file_hash(path)?;
        let prior = self.with_connection(|conn| files::find_by_hash(conn, &file_hash))?;
        Ok(FileCheck { file_hash, prior })
    }

    pub fn register_processed_file(&self, file: &NewProcessedFile) -> StorageResult<i64> {
        self.with_connection(|conn| files::register_processed_file(conn, file))
    }

    /// Register many files atomically. Returns file hash → id.
    pub fn register_processed_files_bulk(
        &self,
        new_files: &[NewProcessedFile],
        progress: Option<ProgressFn<'_>>,
    ) -> StorageResult<BTreeMap<String, i64>> {
        let interval = self.config.files.effective_progress_interval();
        self.with_connection(|conn| {
            files::register_processed_files_bulk(conn, new_files, interval, progress)
        })
    }

    /// Every processed file, newest first.
    pub fn get_processed_files_summary(&self) -> StorageResult<Vec<ProcessedFile>> {
        self.with_connection(files::list_processed_files)
    }

    // ── Transaction store ──────────────────────────────────────────────

    /// Insert one file's rows with the configured batch size.
    pub fn insert_transactions(
        &mut self,
        rows: &[Row],
        file_id: i64,
        progress: Option<ProgressFn<'_>>,
    ) -> StorageResult<InsertReport> {
        self.insert_transactions_with(rows, file_id, &InsertOptions::default(), progress)
    }

    pub fn insert_transactions_with(
        &mut self,
        rows: &[Row],
        file_id: i64,
        options: &InsertOptions,
        progress: Option<ProgressFn<'_>>,
    ) -> StorageResult<InsertReport> {
        let tagged: Vec<(i64, &Row)> = rows.iter().map(|row| (file_id, row)).collect();
        let mut settings = self.write_settings(DurabilityProfile::Ingest);
        settings.batch_size = options.batch_size.unwrap_or(settings.batch_size);
        settings.progress_offset = options.progress_offset;
        settings.progress_total = options.progress_total;
        self.write(&tagged, &settings, progress)
    }

    /// Backfill path: rows from many files in one call, no fsync and an
    /// in-memory journal. A crash mid-call can corrupt the database; use only
    /// for rebuilds from source files.
    pub fn insert_transactions_bulk(
        &mut self,
        rows: &[FileRow],
        progress: Option<ProgressFn<'_>>,
    ) -> StorageResult<InsertReport> {
        let tagged: Vec<(i64, &Row)> = rows.iter().map(|r| (r.file_id, &r.fields)).collect();
        let settings = self.write_settings(DurabilityProfile::Backfill);
        self.write(&tagged, &settings, progress)
    }

    fn write_settings(&self, profile: DurabilityProfile) -> WriteSettings {
        let ingest = &self.config.ingest;
        let batch_size = match profile {
            DurabilityProfile::Ingest => ingest.effective_batch_size(),
            DurabilityProfile::Backfill => ingest.effective_bulk_batch_size(),
        };
        WriteSettings {
            profile,
            batch_size,
            max_rows_per_statement: ingest.effective_max_rows_per_statement(),
            skip_accounting: ingest.effective_skip_accounting(),
            collision_policy: ingest.effective_collision_policy(),
            progress_offset: 0,
            progress_total: None,
        }
    }

    fn write(
        &mut self,
        rows: &[(i64, &Row)],
        settings: &WriteSettings,
        progress: Option<ProgressFn<'_>>,
    ) -> StorageResult<InsertReport> {
        let conn = self.connect()?;
        insert_rows(&conn, &mut self.schema, rows, settings, progress)
    }

    // ── Queries ────────────────────────────────────────────────────────

    /// Materialized rows matching `filter`.
    ///
    /// `limit: Some(0)` emits `LIMIT 0` and returns no rows; it is not a
    /// synonym for "unlimited". Use `None` to read every match.
    pub fn query_transactions(
        &self,
        filter: Option<&str>,
        params: QueryParams<'_>,
        limit: Option<usize>,
        columns: Option<&[&str]>,
    ) -> StorageResult<Vec<Row>> {
        self.with_connection(|conn| {
            transactions::query_transactions(conn, &self.schema, filter, params, limit, columns)
        })
    }

    /// Prepare a forward-only stream on a caller-held connection (see
    /// [`RemitStore::connect`]).
    pub fn query_transactions_streaming<'c>(
        &self,
        conn: &'c Connection,
        columns: Option<&[&str]>,
        filter: Option<&str>,
        params: QueryParams<'_>,
    ) -> StorageResult<TransactionStream<'c>> {
        TransactionStream::prepare(conn, &self.schema, columns, filter, params)
    }

    /// Stream matching rows into `visit`, one at a time. Stops at the first
    /// error `visit` returns. Returns the number of rows visited.
    pub fn stream_transactions<F>(
        &self,
        columns: Option<&[&str]>,
        filter: Option<&str>,
        params: QueryParams<'_>,
        mut visit: F,
    ) -> StorageResult<usize>
    where
        F: FnMut(StreamItem) -> StorageResult<()>,
    {
        let conn = self.connect()?;
        let mut stream = self.query_transactions_streaming(&conn, columns, filter, params)?;
        let mut visited = 0;
        for item in stream.rows()? {
            visit(item?)?;
            visited += 1;
        }
        Ok(visited)
    }

    pub fn get_transaction_count(&self, filter: Option<&str>, params: QueryParams<'_>) -> StorageResult<usize> {
        self.with_connection(|conn| transactions::count_transactions(conn, filter, params))
    }

    /// Columns on the transaction table, in declaration order.
    pub fn get_all_columns(&self) -> StorageResult<Vec<String>> {
        self.with_connection(table_columns)
    }

    pub fn get_column_count(&self) -> StorageResult<usize> {
        Ok(self.get_all_columns()?.len())
    }

    pub fn get_statistics(&self) -> StorageResult<Statistics> {
        self.with_connection(|conn| collect_statistics(conn, &self.path))
    }

    pub fn export_to_csv(
        &self,
        out: &Path,
        filter: Option<&str>,
        params: QueryParams<'_>,
    ) -> StorageResult<usize> {
        self.with_connection(|conn| export::export_csv(conn, out, filter, params))
    }

    /// Truncate transactions and processed files. Does nothing unless
    /// `confirm` is set.
    pub fn clear_all_data(&self, confirm: bool) -> StorageResult<bool> {
        self.with_connection(|conn| maintenance::clear_all_data(conn, confirm))
    }
}
