//! Distributed lock configuration

use kvg_domain::constants::LOCK_DEFAULT_TTL_SECS;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lock defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// TTL applied when a caller does not pick one, in seconds
    pub default_ttl_secs: u64,
}

impl LockConfig {
    /// Default TTL as a duration
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: LOCK_DEFAULT_TTL_SECS,
        }
    }
}
