//! CSV export, streamed straight from the cursor.

use std::path::Path;

use remit_core::errors::StorageResult;
use rusqlite::Connection;
use tracing::info;

use super::{bind_params, column_names, value_to_string, where_suffix, QueryParams};
use crate::schema::ddl::TRANSACTIONS_TABLE;
use crate::schema::sanitize::is_internal_column;

/// Write matching transactions to `out` with a header row, leaving out the
/// bookkeeping columns. Returns the number of data rows written.
pub fn export_csv(
    conn: &Connection,
    out: &Path,
    filter: Option<&str>,
    params: QueryParams<'_>,
) -> StorageResult<usize> {
    let sql = format!("SELECT * FROM {TRANSACTIONS_TABLE}{}", where_suffix(filter));
    let mut stmt = conn.prepare(&sql)?;
    bind_params(&mut stmt, params)?;

    let (keep, header): (Vec<usize>, Vec<String>) = column_names(&stmt)
        .into_iter()
        .enumerate()
        .filter(|(_, name)| !is_internal_column(name))
        .unzip();

    let mut writer = csv::Writer::from_path(out)?;
    writer.write_record(&header)?;

    let mut count = 0;
    let mut record = Vec::with_capacity(keep.len());
    let mut rows = stmt.raw_query();
    while let Some(row) = rows.next()? {
        record.clear();
        for &idx in &keep {
            record.push(value_to_string(row.get_ref(idx)?));
        }
        writer.write_record(&record)?;
        count += 1;
    }
    writer.flush()?;

    info!(rows = count, path = %out.display(), "exported transactions to CSV");
    Ok(count)
}
