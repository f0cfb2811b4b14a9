//! Cache-Protected Read-Through Accessor
//!
//! Wraps a backing-store lookup with cache-first reads. Three protection
//! levels are available:
//!
//! | Mode | Absent records | Concurrent misses |
//! |------|----------------|-------------------|
//! | `Unprotected` | reach the backing store every time | each one loads |
//! | `NullMarker` | cached under a short-lived negative marker | each one loads |
//! | `Locked` | cached under a negative marker | one loads, the rest poll |

use crate::use_cases::lock_service::DistributedLockService;
use kvg_domain::constants::{
    CACHE_LOCK_KEY_PREFIX, CACHE_NEGATIVE_TTL_SECS, CACHE_POSITIVE_TTL_SECS,
    LOCK_DEFAULT_TTL_SECS, NEGATIVE_CACHE_MARKER,
};
use kvg_domain::error::{Error, Result};
use kvg_domain::ports::{KeyValueStore, LockProvider};
use kvg_domain::value_objects::{CacheLookup, CacheStats, LockGuard, ProtectionMode, RetryPolicy};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

/// Tunables for [`ReadThroughCache`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    /// Lifetime of a cached record
    pub positive_ttl: Duration,
    /// Lifetime of a negative marker
    pub negative_ttl: Duration,
    /// Lifetime of the per-key population lock
    pub lock_ttl: Duration,
    /// How losers of the population lock wait
    pub poll: RetryPolicy,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            positive_ttl: Duration::from_secs(CACHE_POSITIVE_TTL_SECS),
            negative_ttl: Duration::from_secs(CACHE_NEGATIVE_TTL_SECS),
            lock_ttl: Duration::from_secs(LOCK_DEFAULT_TTL_SECS),
            poll: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    negative_hits: AtomicU64,
    misses: AtomicU64,
    loads: AtomicU64,
}

impl Counters {
    fn record<T>(&self, lookup: &CacheLookup<T>) {
        let counter = match lookup {
            CacheLookup::Hit(_) => &self.hits,
            CacheLookup::NegativeHit => &self.negative_hits,
            CacheLookup::Miss => &self.misses,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Read-through accessor over a shared key-value store
///
/// Cheap to clone; clones share the same statistics.
#[derive(Clone)]
pub struct ReadThroughCache {
    store: Arc<dyn KeyValueStore>,
    locks: DistributedLockService,
    settings: CacheSettings,
    counters: Arc<Counters>,
}

impl ReadThroughCache {
    /// Create an accessor with default settings
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_settings(store, CacheSettings::default())
    }

    /// Create an accessor with explicit settings
    pub fn with_settings(store: Arc<dyn KeyValueStore>, settings: CacheSettings) -> Self {
        let locks = DistributedLockService::new(Arc::clone(&store));
        Self {
            store,
            locks,
            settings,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Active settings
    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    /// Read without penetration protection
    ///
    /// Absent records are never cached, so every lookup of a missing key
    /// reaches `loader`. A negative marker written by a protected reader is
    /// treated as a miss.
    pub async fn read<T, F, Fut>(&self, key: &str, loader: F) -> Result<Option<T>>
    where
        T: Serialize + DeserializeOwned + Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<Option<T>>> + Send,
    {
        let lookup = self.lookup::<T>(key).await?;
        if let CacheLookup::Hit(value) = lookup {
            return Ok(Some(value));
        }

        let loaded = self.load(key, loader).await?;
        if let Some(value) = &loaded {
            self.store_record(key, value).await?;
        }
        Ok(loaded)
    }

    /// Read with negative-result caching
    pub async fn read_protected<T, F, Fut>(&self, key: &str, loader: F) -> Result<Option<T>>
    where
        T: Serialize + DeserializeOwned + Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<Option<T>>> + Send,
    {
        if let Some(resolved) = self.lookup::<T>(key).await?.into_resolved() {
            return Ok(resolved);
        }
        self.populate(key, loader).await
    }

    /// Read with negative-result caching and a per-key population lock
    ///
    /// Only the lock holder calls `loader`. Everyone else polls the cache
    /// under the configured backoff and fails with [`Error::LockTimeout`]
    /// once the attempts run out. Statistics count one read per call, however
    /// many polls it takes.
    pub async fn read_locked<T, F, Fut>(&self, key: &str, loader: F) -> Result<Option<T>>
    where
        T: Serialize + DeserializeOwned + Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<Option<T>>> + Send,
    {
        if let Some(resolved) = self.lookup::<T>(key).await?.into_resolved() {
            return Ok(resolved);
        }

        let lock_key = format!("{CACHE_LOCK_KEY_PREFIX}{key}");
        let poll = self.settings.poll;
        let attempts = poll.max_attempts.max(1);

        for attempt in 0..attempts {
            if let Some(guard) = self
                .locks
                .try_acquire(&lock_key, self.settings.lock_ttl)
                .await?
            {
                return self.populate_under_lock(key, &guard, loader).await;
            }

            let delay = poll.backoff_for(attempt);
            debug!(key, attempt, delay_ms = delay.as_millis() as u64, "Waiting for cache population");
            tokio::time::sleep(delay).await;

            if let Some(resolved) = self.fetch::<T>(key).await?.into_resolved() {
                return Ok(resolved);
            }
        }

        warn!(key, attempts, "Gave up waiting for cache population");
        Err(Error::lock_timeout(lock_key, attempts))
    }

    /// Dispatch to the read path selected by `mode`
    pub async fn read_with_mode<T, F, Fut>(
        &self,
        mode: ProtectionMode,
        key: &str,
        loader: F,
    ) -> Result<Option<T>>
    where
        T: Serialize + DeserializeOwned + Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<Option<T>>> + Send,
    {
        match mode {
            ProtectionMode::Unprotected => self.read(key, loader).await,
            ProtectionMode::NullMarker => self.read_protected(key, loader).await,
            ProtectionMode::Locked => self.read_locked(key, loader).await,
        }
    }

    /// Drop whatever is cached under `key`, record or negative marker
    pub async fn invalidate(&self, key: &str) -> Result<bool> {
        let removed = self.store.delete(key).await?;
        debug!(key, removed, "Cache entry invalidated");
        Ok(removed)
    }

    /// Snapshot of the accessor's counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            negative_hits: self.counters.negative_hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            loads: self.counters.loads.load(Ordering::Relaxed),
        }
    }

    /// First read of a call; the only one that touches the counters
    async fn lookup<T: DeserializeOwned>(&self, key: &str) -> Result<CacheLookup<T>> {
        let lookup = self.fetch(key).await?;
        self.counters.record(&lookup);
        Ok(lookup)
    }

    async fn fetch<T: DeserializeOwned>(&self, key: &str) -> Result<CacheLookup<T>> {
        let raw = self.store.get(key).await?;
        let lookup = match CacheLookup::decode(raw.as_deref()) {
            Ok(lookup) => lookup,
            Err(e) => {
                warn!(key, error = %e, "Cached value is unreadable; treating as miss");
                CacheLookup::Miss
            }
        };
        match &lookup {
            CacheLookup::Hit(_) => debug!(key, "Cache hit"),
            CacheLookup::NegativeHit => debug!(key, "Negative cache hit"),
            CacheLookup::Miss => debug!(key, "Cache miss"),
        }
        Ok(lookup)
    }

    async fn populate_under_lock<T, F, Fut>(
        &self,
        key: &str,
        guard: &LockGuard,
        loader: F,
    ) -> Result<Option<T>>
    where
        T: Serialize + DeserializeOwned + Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<Option<T>>> + Send,
    {
        let result = match self.fetch::<T>(key).await {
            Ok(lookup) => match lookup.into_resolved() {
                Some(resolved) => Ok(resolved),
                None => self.populate(key, loader).await,
            },
            Err(e) => Err(e),
        };
        self.locks.release_logged(guard).await;
        result
    }

    async fn populate<T, F, Fut>(&self, key: &str, loader: F) -> Result<Option<T>>
    where
        T: Serialize + Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<Option<T>>> + Send,
    {
        let loaded = self.load(key, loader).await?;
        match &loaded {
            Some(value) => self.store_record(key, value).await?,
            None => {
                self.store
                    .set(key, NEGATIVE_CACHE_MARKER, self.settings.negative_ttl)
                    .await?;
                debug!(key, "Cached negative marker");
            }
        }
        Ok(loaded)
    }

    async fn load<T, F, Fut>(&self, key: &str, loader: F) -> Result<Option<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        self.counters.loads.fetch_add(1, Ordering::Relaxed);
        debug!(key, "Loading from backing store");
        loader().await
    }

    async fn store_record<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let encoded = serde_json::to_string(value)?;
        self.store
            .set(key, &encoded, self.settings.positive_ttl)
            .await
    }
}

impl std::fmt::Debug for ReadThroughCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadThroughCache")
            .field("store", &self.store.provider_name())
            .field("settings", &self.settings)
            .finish()
    }
}
