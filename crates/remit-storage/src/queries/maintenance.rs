//! Destructive maintenance.

use remit_core::errors::StorageResult;
use rusqlite::Connection;
use tracing::{info, warn};

/// Delete every transaction and processed-file row. Columns and the column
/// registry are kept. Without `confirm` nothing happens and `false` is
/// returned.
pub fn clear_all_data(conn: &Connection, confirm: bool) -> StorageResult<bool> {
    if !confirm {
        warn!("clear_all_data called without confirmation");
        return Ok(false);
    }

    let tx = conn.unchecked_transaction()?;
    let transactions = tx.execute("DELETE FROM edi_transactions", [])?;
    let files = tx.execute("DELETE FROM processed_files", [])?;
    tx.commit()?;

    info!(transactions, files, "all data cleared");
    Ok(true)
}
