//! Materialized transaction queries.

use remit_core::errors::StorageResult;
use remit_core::types::records::Row;
use rusqlite::Connection;

use super::{bind_params, column_names, read_row, select_list, where_suffix, QueryParams};
use crate::schema::ddl::TRANSACTIONS_TABLE;
use crate::schema::SchemaManager;

/// Rows matching `filter`, all in memory. `columns = None` selects every
/// column including the bookkeeping ones. `limit` is applied as given, so
/// `Some(0)` yields nothing; pass `None` for no limit.
pub fn query_transactions(
    conn: &Connection,
    schema: &SchemaManager,
    filter: Option<&str>,
    params: QueryParams<'_>,
    limit: Option<usize>,
    columns: Option<&[&str]>,
) -> StorageResult<Vec<Row>> {
    let mut sql = format!(
        "SELECT {} FROM {TRANSACTIONS_TABLE}{}",
        select_list(schema, columns)?,
        where_suffix(filter)
    );
    if let Some(limit) = limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }

    let mut stmt = conn.prepare(&sql)?;
    bind_params(&mut stmt, params)?;
    let names = column_names(&stmt);

    let mut out = Vec::new();
    let mut rows = stmt.raw_query();
    while let Some(row) = rows.next()? {
        out.push(read_row(row, &names)?);
    }
    Ok(out)
}

/// Number of rows matching `filter`.
pub fn count_transactions(
    conn: &Connection,
    filter: Option<&str>,
    params: QueryParams<'_>,
) -> StorageResult<usize> {
    let sql = format!("SELECT COUNT(*) FROM {TRANSACTIONS_TABLE}{}", where_suffix(filter));
    let count: i64 = conn.query_row(&sql, params, |row| row.get(0))?;
    Ok(count.max(0) as usize)
}
