//! Tracing setup for binaries and tests embedding the store.
//!
//! The store itself only emits events; installing a subscriber is the
//! embedding application's call.

use tracing_subscriber::EnvFilter;

/// Environment variable consulted for the filter directive.
pub const LOG_ENV: &str = "REMIT_LOG";

/// Install a fmt subscriber filtered by `REMIT_LOG`, falling back to
/// `default_directive` (e.g. `"remit_storage=info"`).
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
