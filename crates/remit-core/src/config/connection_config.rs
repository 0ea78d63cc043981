//! Connection configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings applied to every connection the store opens.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ConnectionConfig {
    /// How long a statement waits on a lock before failing with busy.
    /// Default: 30_000 ms.
    pub busy_timeout_ms: Option<u64>,
}

impl ConnectionConfig {
    pub fn effective_busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms.unwrap_or(30_000))
    }
}
