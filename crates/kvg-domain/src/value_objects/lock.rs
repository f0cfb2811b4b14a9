//! Lock ownership value objects

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque per-acquisition ownership token
///
/// Generated from a random (v4) UUID so a competing holder cannot guess it
/// and release somebody else's lock.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockToken(String);

impl LockToken {
    /// Generate a fresh, unpredictable token
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Token as stored in the key-value store
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LockToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lock guard token returned when a lock is acquired
///
/// Dropping a guard does not release the lock: release is a store round-trip
/// and must be awaited explicitly. An abandoned guard expires with its TTL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockGuard {
    /// Lock key
    pub key: String,
    /// Unique token for this lock acquisition
    pub token: LockToken,
}

impl LockGuard {
    /// Create a guard for `key` owned through `token`
    pub fn new<K: Into<String>>(key: K, token: LockToken) -> Self {
        Self {
            key: key.into(),
            token,
        }
    }
}
