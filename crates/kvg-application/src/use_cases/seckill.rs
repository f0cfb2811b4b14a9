//! Seckill Use Case
//!
//! Flash-sale stock decrement serialized by a distributed lock. The stock
//! counter and the lock live under different keys; the lock is the only
//! thing keeping the read-modify-write of the counter atomic.

use crate::use_cases::lock_service::DistributedLockService;
use kvg_domain::constants::SECKILL_STOCK_TTL_SECS;
use kvg_domain::error::{Error, Result};
use kvg_domain::ports::{KeyValueStore, LockProvider};
use kvg_domain::value_objects::{DecrementOutcome, LockGuard, RetryPolicy};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Tunables for [`SeckillService`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeckillSettings {
    /// Lifetime of the stock counter after every write
    pub stock_ttl: Duration,
    /// Simulated business work performed while holding the lock
    pub work_delay: Duration,
}

impl Default for SeckillSettings {
    fn default() -> Self {
        Self {
            stock_ttl: Duration::from_secs(SECKILL_STOCK_TTL_SECS),
            work_delay: Duration::ZERO,
        }
    }
}

/// Stock decrement workflow
#[derive(Clone)]
pub struct SeckillService {
    store: Arc<dyn KeyValueStore>,
    locks: DistributedLockService,
    settings: SeckillSettings,
}

impl SeckillService {
    /// Create a service with default settings
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_settings(store, SeckillSettings::default())
    }

    /// Create a service with explicit settings
    pub fn with_settings(store: Arc<dyn KeyValueStore>, settings: SeckillSettings) -> Self {
        let locks = DistributedLockService::new(Arc::clone(&store));
        Self {
            store,
            locks,
            settings,
        }
    }

    /// Seed the counter under `stock_key`
    pub async fn init_stock(&self, stock_key: &str, amount: i64) -> Result<()> {
        self.store
            .set(stock_key, &amount.to_string(), self.settings.stock_ttl)
            .await?;
        info!(stock_key, amount, "Stock initialized");
        Ok(())
    }

    /// Current counter value, if seeded
    pub async fn stock(&self, stock_key: &str) -> Result<Option<i64>> {
        match self.store.get(stock_key).await? {
            Some(raw) => parse_stock(stock_key, &raw).map(Some),
            None => Ok(None),
        }
    }

    /// Take one unit of stock if any is left
    ///
    /// Makes exactly one lock attempt. Contention yields
    /// [`DecrementOutcome::LockBusy`]; the caller decides whether to retry.
    pub async fn decrement_if_positive(
        &self,
        stock_key: &str,
        lock_key: &str,
        lock_ttl: Duration,
    ) -> Result<DecrementOutcome> {
        let Some(guard) = self.locks.try_acquire(lock_key, lock_ttl).await? else {
            debug!(lock_key, "Seckill lock busy");
            return Ok(DecrementOutcome::LockBusy);
        };

        let outcome = self.decrement_locked(stock_key, &guard).await;
        self.locks.release_logged(&guard).await;

        if let Ok(outcome) = &outcome {
            info!(stock_key, outcome = %outcome.message(), "Seckill attempt finished");
        }
        outcome
    }

    /// Retry [`Self::decrement_if_positive`] while the lock is busy
    ///
    /// Returns the last outcome once it is no longer `LockBusy` or the
    /// policy's attempts are used up.
    pub async fn purchase_with_retry(
        &self,
        stock_key: &str,
        lock_key: &str,
        lock_ttl: Duration,
        policy: &RetryPolicy,
    ) -> Result<DecrementOutcome> {
        let attempts = policy.max_attempts.max(1);
        let mut outcome = DecrementOutcome::LockBusy;

        for attempt in 0..attempts {
            outcome = self
                .decrement_if_positive(stock_key, lock_key, lock_ttl)
                .await?;
            if !outcome.is_retryable() {
                break;
            }
            if attempt + 1 < attempts {
                tokio::time::sleep(policy.backoff_for(attempt)).await;
            }
        }
        Ok(outcome)
    }

    async fn decrement_locked(&self, stock_key: &str, guard: &LockGuard) -> Result<DecrementOutcome> {
        let current = match self.stock(stock_key).await? {
            Some(current) if current > 0 => current,
            _ => return Ok(DecrementOutcome::Depleted),
        };

        if !self.settings.work_delay.is_zero() {
            tokio::time::sleep(self.settings.work_delay).await;
        }

        let remaining = current - 1;
        self.store
            .set(stock_key, &remaining.to_string(), self.settings.stock_ttl)
            .await?;
        debug!(stock_key, lock_key = %guard.key, remaining, "Stock decremented");
        Ok(DecrementOutcome::Success { remaining })
    }
}

fn parse_stock(stock_key: &str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|e| Error::invalid_data(stock_key, format!("stock value '{raw}' is not an integer: {e}")))
}

impl std::fmt::Debug for SeckillService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeckillService")
            .field("store", &self.store.provider_name())
            .field("settings", &self.settings)
            .finish()
    }
}
