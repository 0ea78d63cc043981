//! Connection opening. Every operation gets its own connection and drops it
//! on return; only the ingest paths hold one across several commits.

pub mod pragmas;

use std::path::Path;

use remit_core::config::ConnectionConfig;
use remit_core::errors::StorageResult;
use rusqlite::Connection;

pub use pragmas::{apply_pragmas, DurabilityProfile, RelaxedDurability};

/// Open a read-write connection with the busy timeout and baseline pragmas.
pub fn open_connection(path: &Path, config: &ConnectionConfig) -> StorageResult<Connection> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(config.effective_busy_timeout())?;
    apply_pragmas(&conn)?;
    Ok(conn)
}
