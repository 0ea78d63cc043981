//! Read side: filtered queries, streaming, statistics, CSV export.
//!
//! Filters are raw SQL predicate fragments supplied by trusted callers;
//! variable data must go through the positional `params`. Column lists are
//! sanitized and checked against the schema before any SQL is built.

pub mod export;
pub mod maintenance;
pub mod stats;
pub mod stream;
pub mod transactions;

use remit_core::errors::{StorageError, StorageResult};
use remit_core::types::records::Row;
use rusqlite::types::{ToSql, ValueRef};
use rusqlite::{Row as SqlRow, Statement};

use crate::schema::sanitize::{quote_ident, sanitize_column_name};
use crate::schema::SchemaManager;

/// Positional parameters for a filter fragment (`?1`, `?2`, … or `?`).
pub type QueryParams<'a> = &'a [&'a dyn ToSql];

/// Render a stored value as text. NULL reads back as `""`.
pub(crate) fn value_to_string(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => hex::encode(b),
    }
}

/// Collect a result row into a column-name → text map.
pub(crate) fn read_row(row: &SqlRow<'_>, names: &[String]) -> rusqlite::Result<Row> {
    let mut out = Row::new();
    for (idx, name) in names.iter().enumerate() {
        out.insert(name.clone(), value_to_string(row.get_ref(idx)?));
    }
    Ok(out)
}

/// Owned copy of a prepared statement's result column names.
pub(crate) fn column_names(stmt: &Statement<'_>) -> Vec<String> {
    stmt.column_names().into_iter().map(String::from).collect()
}

/// `" WHERE <filter>"`, or nothing for an absent or blank filter.
pub(crate) fn where_suffix(filter: Option<&str>) -> String {
    match filter.map(str::trim) {
        Some(f) if !f.is_empty() => format!(" WHERE {f}"),
        _ => String::new(),
    }
}

/// SELECT list for the requested columns, or `*`. Each requested name is
/// sanitized and must exist on the transaction table; results are keyed
/// by the on-disk spelling.
pub(crate) fn select_list(schema: &SchemaManager, columns: Option<&[&str]>) -> StorageResult<String> {
    let Some(columns) = columns.filter(|c| !c.is_empty()) else {
        return Ok("*".to_string());
    };

    let mut quoted = Vec::with_capacity(columns.len());
    for requested in columns {
        let column = sanitize_column_name(requested);
        let Some(on_disk) = schema.resolve_column(&column) else {
            return Err(StorageError::UnknownColumn { column });
        };
        quoted.push(quote_ident(on_disk));
    }
    Ok(quoted.join(", "))
}

pub(crate) fn bind_params(stmt: &mut Statement<'_>, params: QueryParams<'_>) -> StorageResult<()> {
    for (idx, param) in params.iter().enumerate() {
        stmt.raw_bind_parameter(idx + 1, *param)?;
    }
    Ok(())
}
