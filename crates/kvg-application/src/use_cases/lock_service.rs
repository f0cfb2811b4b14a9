//! Distributed Lock Use Case
//!
//! Token-owned locks on top of the store's atomic set-if-absent.
//! Ownership lasts until release or TTL expiry, whichever comes first;
//! a crashed holder therefore blocks others for at most one TTL.

use async_trait::async_trait;
use kvg_domain::error::Result;
use kvg_domain::ports::{KeyValueStore, LockProvider};
use kvg_domain::value_objects::{LockGuard, LockToken};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Distributed lock service backed by a shared key-value store
#[derive(Clone)]
pub struct DistributedLockService {
    store: Arc<dyn KeyValueStore>,
}

impl DistributedLockService {
    /// Create a lock service over `store`
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The store holding the lock records
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Run `work` while holding the lock on `key`
    ///
    /// Returns `Ok(None)` without running `work` when the lock is held
    /// elsewhere. The lock is released after `work` finishes, whether it
    /// succeeded or not; a failed release is logged and left to the TTL.
    pub async fn with_lock<F, Fut, T>(&self, key: &str, ttl: Duration, work: F) -> Result<Option<T>>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send,
        T: Send,
    {
        let Some(guard) = self.try_acquire(key, ttl).await? else {
            return Ok(None);
        };

        let outcome = work().await;
        self.release_logged(&guard).await;
        outcome.map(Some)
    }

    /// Release `guard`, logging instead of propagating store faults
    pub(crate) async fn release_logged(&self, guard: &LockGuard) {
        if let Err(e) = self.release(guard).await {
            warn!(
                key = %guard.key,
                error = %e,
                "Failed to release lock; it will expire on its own"
            );
        }
    }
}

#[async_trait]
impl LockProvider for DistributedLockService {
    async fn try_acquire(&self, key: &str, ttl: Duration) -> Result<Option<LockGuard>> {
        let token = LockToken::generate();
        if self.store.set_if_absent(key, token.as_str(), ttl).await? {
            info!(key, ttl_ms = ttl.as_millis() as u64, "Lock acquired");
            Ok(Some(LockGuard::new(key, token)))
        } else {
            debug!(key, "Lock held elsewhere");
            Ok(None)
        }
    }

    async fn release(&self, guard: &LockGuard) -> Result<bool> {
        let released = self
            .store
            .compare_and_delete(&guard.key, guard.token.as_str())
            .await?;
        if released {
            info!(key = %guard.key, "Lock released");
        } else {
            warn!(
                key = %guard.key,
                token = %guard.token,
                "Lock not released: held by another owner or already expired"
            );
        }
        Ok(released)
    }

    async fn renew(&self, guard: &LockGuard, ttl: Duration) -> Result<bool> {
        let token = guard.token.as_str();
        if self.store.refresh_if_equals(&guard.key, token, ttl).await? {
            debug!(key = %guard.key, ttl_ms = ttl.as_millis() as u64, "Lock renewed");
            return Ok(true);
        }

        let reacquired = self.store.set_if_absent(&guard.key, token, ttl).await?;
        if reacquired {
            info!(key = %guard.key, "Lock had lapsed and was re-acquired on renew");
        } else {
            debug!(key = %guard.key, "Lock renew failed: held elsewhere");
        }
        Ok(reacquired)
    }
}

impl std::fmt::Debug for DistributedLockService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistributedLockService")
            .field("store", &self.store.provider_name())
            .finish()
    }
}
