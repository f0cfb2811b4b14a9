//! Distributed Lock Provider Port
//!
//! Defines the contract for distributed lock coordination services.
//!
//! Per lock key the protocol moves `UNLOCKED -> LOCKED(token) -> UNLOCKED`,
//! leaving `LOCKED` on release or TTL expiry. Renewal is a self-loop on
//! `LOCKED(token)`.

use crate::error::Result;
use crate::value_objects::LockGuard;
use async_trait::async_trait;
use std::time::Duration;

/// Distributed lock provider interface
///
/// Contention is not an error: `try_acquire` returns `Ok(None)` and
/// `release`/`renew` return `Ok(false)`. `Err` is reserved for store faults.
#[async_trait]
pub trait LockProvider: Send + Sync {
    /// Try once to take the lock on `key` for `ttl`
    ///
    /// Never waits or retries; retry policy belongs to the caller.
    async fn try_acquire(&self, key: &str, ttl: Duration) -> Result<Option<LockGuard>>;

    /// Release the lock if `guard` still owns it
    ///
    /// # Returns
    /// True if the lock was released, false on an ownership mismatch
    async fn release(&self, guard: &LockGuard) -> Result<bool>;

    /// Extend ownership to `ttl` from now
    ///
    /// When `guard` no longer owns the lock this makes a fresh acquisition
    /// attempt with the guard's token and reports its result.
    async fn renew(&self, guard: &LockGuard, ttl: Duration) -> Result<bool>;
}
