//! Key-Value Store Provider Port
//!
//! Contract for the shared store that owns every piece of persisted state:
//! lock records, cache entries and counters.
//!
//! ## Atomicity
//!
//! [`KeyValueStore::set_if_absent`] must be a single atomic store operation.
//! Mutual exclusion of the lock protocol rests entirely on it; a
//! check-then-set pair would let two callers win the same lock.
//!
//! [`KeyValueStore::compare_and_delete`] and
//! [`KeyValueStore::refresh_if_equals`] come with default implementations
//! built from `get` + `delete`/`set`. Those defaults are not atomic: the entry
//! can expire and be taken by someone else between the read and the write.
//! Providers that can run a conditional write in one step should override
//! them.

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Shared key-value store with per-key expiration
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
///
/// let won = store.set_if_absent("lock:order:7", token.as_str(), Duration::from_secs(5)).await?;
/// if won {
///     // critical section
///     store.compare_and_delete("lock:order:7", token.as_str()).await?;
/// }
/// ```
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Get the live value under `key`
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Unconditionally store `value` under `key`, expiring after `ttl`
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Unconditionally store `value` under `key` without expiration
    async fn set_persistent(&self, key: &str, value: &str) -> Result<()>;

    /// Store `value` only if `key` has no live entry
    ///
    /// # Returns
    /// True if the value was written
    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool>;

    /// Remove `key`
    ///
    /// # Returns
    /// True if a live entry was removed
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Remove `key` only while it holds `expected`
    ///
    /// # Returns
    /// True if the entry matched and was removed
    async fn compare_and_delete(&self, key: &str, expected: &str) -> Result<bool> {
        match self.get(key).await? {
            Some(current) if current == expected => self.delete(key).await,
            _ => Ok(false),
        }
    }

    /// Reset the expiration of `key` to `ttl` only while it holds `expected`
    ///
    /// # Returns
    /// True if the entry matched and its TTL was refreshed
    async fn refresh_if_equals(&self, key: &str, expected: &str, ttl: Duration) -> Result<bool> {
        match self.get(key).await? {
            Some(current) if current == expected => {
                self.set(key, expected, ttl).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Get the name/identifier of this provider implementation
    fn provider_name(&self) -> &str;
}

/// Reject TTLs the store cannot express
pub fn ensure_positive_ttl(ttl: Duration) -> Result<()> {
    if ttl.is_zero() {
        return Err(crate::Error::invalid_argument(
            "TTL must be greater than zero",
        ));
    }
    Ok(())
}
