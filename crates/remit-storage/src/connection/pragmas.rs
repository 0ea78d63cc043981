//! PRAGMA profiles.
//!
//! Normal connections run with strict durability. The ingest paths switch to
//! a relaxed profile for the duration of one call and restore the strict one
//! from a drop guard, so every exit path (success, error, panic unwind)
//! leaves the database in its durable configuration.

use remit_core::errors::StorageResult;
use rusqlite::Connection;
use tracing::warn;

/// Baseline applied to every connection.
const BASELINE_PRAGMAS: &str = "
    PRAGMA foreign_keys = ON;
    PRAGMA temp_store = MEMORY;
";

/// Incremental ingest: crash-safe (WAL + NORMAL) but tuned for throughput.
const INGEST_PRAGMAS: &str = "
    PRAGMA synchronous = NORMAL;
    PRAGMA journal_mode = WAL;
    PRAGMA cache_size = -128000;
    PRAGMA temp_store = MEMORY;
    PRAGMA mmap_size = 268435456;
    PRAGMA page_size = 8192;
    PRAGMA locking_mode = EXCLUSIVE;
";

/// One-time backfill: no fsync, in-memory journal. Not crash-safe.
const BACKFILL_PRAGMAS: &str = "
    PRAGMA synchronous = OFF;
    PRAGMA journal_mode = MEMORY;
    PRAGMA cache_size = -256000;
    PRAGMA temp_store = MEMORY;
    PRAGMA mmap_size = 536870912;
    PRAGMA locking_mode = EXCLUSIVE;
";

/// Restored after every ingest call.
const STRICT_PRAGMAS: &str = "
    PRAGMA synchronous = FULL;
    PRAGMA journal_mode = DELETE;
    PRAGMA locking_mode = NORMAL;
";

/// Apply the baseline pragmas to a freshly opened connection.
pub fn apply_pragmas(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(BASELINE_PRAGMAS)?;
    Ok(())
}

/// Restore strict durability settings.
pub fn restore_strict(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(STRICT_PRAGMAS)?;
    Ok(())
}

/// Which relaxed profile an ingest call runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurabilityProfile {
    Ingest,
    Backfill,
}

impl DurabilityProfile {
    fn pragmas(self) -> &'static str {
        match self {
            Self::Ingest => INGEST_PRAGMAS,
            Self::Backfill => BACKFILL_PRAGMAS,
        }
    }
}

/// Holds a connection in a relaxed profile; restores strict settings on drop.
///
/// Must be dropped after any open transaction on the same connection:
/// `journal_mode` cannot change inside a transaction.
pub struct RelaxedDurability<'c> {
    conn: &'c Connection,
    profile: DurabilityProfile,
}

impl<'c> RelaxedDurability<'c> {
    pub fn apply(conn: &'c Connection, profile: DurabilityProfile) -> StorageResult<Self> {
        // Guard first: a partially applied profile is still restored.
        let guard = Self { conn, profile };
        conn.execute_batch(profile.pragmas())?;
        Ok(guard)
    }

    pub fn profile(&self) -> DurabilityProfile {
        self.profile
    }
}

impl Drop for RelaxedDurability<'_> {
    fn drop(&mut self) {
        if let Err(e) = restore_strict(self.conn) {
            warn!(error = %e, profile = ?self.profile, "failed to restore strict durability pragmas");
        }
    }
}
