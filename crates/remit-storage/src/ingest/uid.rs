//! Transaction identity.

use remit_core::catalog::IDENTITY_FIELDS;
use remit_core::types::records::Row;
use sha2::{Digest, Sha256};

/// Bytes of digest kept; hex-encoded this is 32 chars.
const UID_BYTES: usize = 16;

/// Stable id for a record: SHA-256 over the five identity fields joined by
/// `|` (missing fields count as empty), truncated to 32 hex chars.
///
/// Two rows with the same identity tuple get the same uid regardless of
/// their other fields, so re-ingesting a file collapses onto existing rows.
pub fn generate_transaction_uid(row: &Row) -> String {
    let mut hasher = Sha256::new();
    for (i, field) in IDENTITY_FIELDS.iter().enumerate() {
        if i > 0 {
            hasher.update(b"|");
        }
        let value = row.get(*field).map(String::as_str).unwrap_or("");
        hasher.update(value.as_bytes());
    }
    let digest = hasher.finalize();
    hex::encode(&digest[..UID_BYTES])
}
