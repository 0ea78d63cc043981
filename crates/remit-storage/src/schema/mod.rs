//! Schema manager: owns the column registry for the transaction table.
//!
//! The registry is append-only: columns are added (never renamed or dropped)
//! and every addition is recorded in `column_registry` with the display name
//! that introduced it. The in-memory cache is loaded once per store and only
//! mutated here. SQLite resolves column names without regard to ASCII case,
//! so every lookup goes through [`column_key`].

pub mod ddl;
pub mod sanitize;

use remit_core::catalog::{self, INDEXED_FIELDS};
use remit_core::errors::{StorageError, StorageResult};
use remit_core::types::collections::{FxHashMap, FxHashSet};
use rusqlite::{params, Connection};
use tracing::{debug, info, warn};

use self::ddl::{create_base_schema, table_columns, TRANSACTIONS_TABLE};
use self::sanitize::{column_key, is_internal_column, quote_ident, sanitize_column_name};

/// Record a column's source. An existing entry is only filled in when it
/// has no source yet.
const REGISTER_SOURCE_SQL: &str = "INSERT INTO column_registry (column_name, source_name) VALUES (?1, ?2) \
     ON CONFLICT(column_name) DO UPDATE SET source_name = excluded.source_name \
     WHERE column_registry.source_name IS NULL";

/// Per-store schema state: known columns, their source names, and whether
/// the secondary indexes have been built yet.
#[derive(Debug, Default)]
pub struct SchemaManager {
    /// Column key → on-disk spelling.
    columns: FxHashMap<String, String>,
    /// Column key → display name that introduced it; `None` until an ingest
    /// claims a column that predates the registry.
    sources: FxHashMap<String, Option<String>>,
    indexes_created: bool,
}

impl SchemaManager {
    /// Create base tables, load the current columns, and optionally
    /// pre-create every column from the producer's field catalog.
    pub fn initialize(conn: &Connection, precreate_catalog: bool) -> StorageResult<Self> {
        create_base_schema(conn)?;

        let mut manager = Self::default();
        manager.reload(conn)?;

        if precreate_catalog {
            let added = manager.ensure_columns(conn, catalog::all_field_names())?;
            if added > 0 {
                info!(added, "pre-created catalog columns");
            }
        }

        Ok(manager)
    }

    /// Reload the column cache from engine metadata and the registry table.
    /// Columns present on the table but missing from the registry (older
    /// databases) are registered with no source; the first ingest that
    /// writes to one claims it.
    pub fn reload(&mut self, conn: &Connection) -> StorageResult<()> {
        let table = table_columns(conn)?;

        let mut sources: FxHashMap<String, Option<String>> = {
            let mut stmt = conn.prepare("SELECT column_name, source_name FROM column_registry")?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((
                        column_key(&row.get::<_, String>(0)?),
                        row.get::<_, Option<String>>(1)?,
                    ))
                })?
                .collect::<Result<_, _>>()?;
            rows
        };

        let unregistered: Vec<&String> = table
            .iter()
            .filter(|c| !is_internal_column(c) && !sources.contains_key(&column_key(c)))
            .collect();
        if !unregistered.is_empty() {
            let tx = conn.unchecked_transaction()?;
            {
                let mut insert = tx.prepare_cached(
                    "INSERT OR IGNORE INTO column_registry (column_name, source_name) VALUES (?1, NULL)",
                )?;
                for column in &unregistered {
                    insert.execute([column.as_str()])?;
                }
            }
            tx.commit()?;
            debug!(count = unregistered.len(), "backfilled column registry");
            for column in unregistered {
                sources.insert(column_key(column), None);
            }
        }

        self.columns = table.into_iter().map(|c| (column_key(&c), c)).collect();
        self.sources = sources;
        Ok(())
    }

    /// All columns on the transaction table, including bookkeeping columns,
    /// as spelled on disk.
    pub fn known_columns(&self) -> impl Iterator<Item = &str> {
        self.columns.values().map(String::as_str)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains_key(&column_key(column))
    }

    /// On-disk spelling of `column`, matched without regard to case.
    pub fn resolve_column(&self, column: &str) -> Option<&str> {
        self.columns.get(&column_key(column)).map(String::as_str)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Display name that first introduced `column`. `None` for unknown
    /// columns and for columns not yet claimed by an ingest.
    pub fn source_of(&self, column: &str) -> Option<&str> {
        self.sources.get(&column_key(column)).and_then(Option::as_deref)
    }

    pub fn indexes_created(&self) -> bool {
        self.indexes_created
    }

    /// Make sure every field in `fields` has a backing TEXT column.
    ///
    /// All additions happen in one transaction; the cache is updated only
    /// after it commits. When two names in the call map to one column, the
    /// first one seen is recorded as its source. Existing columns without a
    /// source are claimed by the first name seen for them. Returns the
    /// number of columns added.
    pub fn ensure_columns<'a>(
        &mut self,
        conn: &Connection,
        fields: impl IntoIterator<Item = &'a str>,
    ) -> StorageResult<usize> {
        let mut pending: Vec<(String, &'a str)> = Vec::new();
        let mut claims: Vec<(String, &'a str)> = Vec::new();
        let mut seen: FxHashSet<String> = FxHashSet::default();

        for field in fields {
            let column = sanitize_column_name(field);
            if is_internal_column(&column) {
                return Err(StorageError::ReservedColumn {
                    field: field.to_string(),
                    column,
                });
            }
            let key = column_key(&column);
            if !seen.insert(key.clone()) {
                continue;
            }
            match self.columns.get(&key) {
                Some(existing) => {
                    if self.sources.get(&key).map_or(true, Option::is_none) {
                        claims.push((existing.clone(), field));
                    }
                }
                None => pending.push((column, field)),
            }
        }

        if pending.is_empty() && claims.is_empty() {
            return Ok(0);
        }

        let tx = conn.unchecked_transaction()?;
        let mut added: Vec<(String, &'a str)> = Vec::with_capacity(pending.len());
        for (column, field) in pending {
            let sql = format!(
                "ALTER TABLE {TRANSACTIONS_TABLE} ADD COLUMN {} TEXT",
                quote_ident(&column)
            );
            let on_disk = match tx.execute(&sql, []) {
                Ok(_) => {
                    debug!(column = %column, field = %field, "added column");
                    column
                }
                Err(e) if is_duplicate_column(&e) => {
                    let on_disk = on_disk_spelling(&tx, &column)?;
                    debug!(column = %on_disk, "column already exists");
                    on_disk
                }
                Err(e) => {
                    warn!(column = %column, field = %field, error = %e, "could not add column");
                    return Err(e.into());
                }
            };
            added.push((on_disk, field));
        }
        for (column, field) in added.iter().chain(&claims) {
            tx.execute(REGISTER_SOURCE_SQL, params![column, field])?;
        }
        tx.commit()?;

        if !claims.is_empty() {
            debug!(count = claims.len(), "claimed unsourced columns");
        }

        let count = added.len();
        for (column, field) in added.into_iter().chain(claims) {
            let key = column_key(&column);
            let source = self.sources.entry(key.clone()).or_insert(None);
            if source.is_none() {
                *source = Some(field.to_string());
            }
            self.columns.insert(key, column);
        }
        Ok(count)
    }

    /// Build indexes over the high-value query fields that exist as columns.
    /// Runs at most once per store; later calls are no-ops. Individual index
    /// failures are logged and skipped.
    pub fn create_secondary_indexes(&mut self, conn: &Connection) -> StorageResult<usize> {
        if self.indexes_created {
            return Ok(0);
        }

        let mut created = 0;
        for field in INDEXED_FIELDS {
            let Some(column) = self.resolve_column(&sanitize_column_name(field)) else {
                continue;
            };
            let sql = format!(
                "CREATE INDEX IF NOT EXISTS {} ON {TRANSACTIONS_TABLE}({})",
                quote_ident(&format!("idx_{column}")),
                quote_ident(column)
            );
            match conn.execute(&sql, []) {
                Ok(_) => created += 1,
                Err(e) => warn!(column = %column, error = %e, "could not create index"),
            }
        }

        self.indexes_created = true;
        info!(created, "secondary indexes built");
        Ok(created)
    }
}

fn is_duplicate_column(e: &rusqlite::Error) -> bool {
    e.to_string().to_lowercase().contains("duplicate column name")
}

/// Spelling of the existing table column that `column` resolves to.
fn on_disk_spelling(conn: &Connection, column: &str) -> StorageResult<String> {
    let found = table_columns(conn)?
        .into_iter()
        .find(|c| c.eq_ignore_ascii_case(column));
    Ok(found.unwrap_or_else(|| column.to_string()))
}
