//! In-process key-value store
//!
//! DashMap-backed store for single-process deployments and tests.
//! Expired entries are treated as absent by every operation and removed
//! lazily; `purge_expired` sweeps them eagerly.
//!
//! Time is read from `tokio::time::Instant`, so tests running on a paused
//! clock can expire entries with `tokio::time::advance`.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use kvg_domain::error::Result;
use kvg_domain::ports::providers::{KeyValueStore, ensure_positive_ttl};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct StoredValue {
    value: String,
    expires_at: Option<Instant>,
}

impl StoredValue {
    fn expiring(value: &str, ttl: Duration, now: Instant) -> Self {
        Self {
            value: value.to_string(),
            expires_at: now.checked_add(ttl),
        }
    }

    fn persistent(value: &str) -> Self {
        Self {
            value: value.to_string(),
            expires_at: None,
        }
    }

    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|deadline| now < deadline)
    }
}

/// In-process key-value store
///
/// Clones share the same map, so a clone handed to another task sees the
/// same locks and cache entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: Arc<DashMap<String, StoredValue>>,
}

impl MemoryKeyValueStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.iter().filter(|e| e.is_live(now)).count()
    }

    /// Whether the store holds no live entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove expired entries, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live(now));
        before.saturating_sub(self.entries.len())
    }

    /// Remaining lifetime of a live entry; `None` for missing or persistent keys
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.entries
            .get(key)
            .filter(|e| e.is_live(now))
            .and_then(|e| e.expires_at)
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = Instant::now();
        Ok(self
            .entries
            .get(key)
            .filter(|e| e.is_live(now))
            .map(|e| e.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        ensure_positive_ttl(ttl)?;
        self.entries.insert(
            key.to_string(),
            StoredValue::expiring(value, ttl, Instant::now()),
        );
        Ok(())
    }

    async fn set_persistent(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .insert(key.to_string(), StoredValue::persistent(value));
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        ensure_positive_ttl(ttl)?;
        let now = Instant::now();
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_live(now) {
                    return Ok(false);
                }
                occupied.insert(StoredValue::expiring(value, ttl, now));
                Ok(true)
            }
            Entry::Vacant(vacant) => {
                vacant.insert(StoredValue::expiring(value, ttl, now));
                Ok(true)
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let now = Instant::now();
        Ok(self
            .entries
            .remove(key)
            .is_some_and(|(_, entry)| entry.is_live(now)))
    }

    async fn compare_and_delete(&self, key: &str, expected: &str) -> Result<bool> {
        let now = Instant::now();
        Ok(self
            .entries
            .remove_if(key, |_, entry| entry.is_live(now) && entry.value == expected)
            .is_some())
    }

    async fn refresh_if_equals(&self, key: &str, expected: &str, ttl: Duration) -> Result<bool> {
        ensure_positive_ttl(ttl)?;
        let now = Instant::now();
        match self.entries.get_mut(key) {
            Some(mut entry) if entry.is_live(now) && entry.value == expected => {
                entry.expires_at = now.checked_add(ttl);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn provider_name(&self) -> &str {
        "memory"
    }
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

use kvg_application::ports::registry::{
    KV_STORE_PROVIDERS, KeyValueStoreProviderEntry, StoreProviderConfig,
};

/// Factory function for creating in-process store instances.
fn memory_store_factory(
    _config: &StoreProviderConfig,
) -> std::result::Result<Arc<dyn KeyValueStore>, String> {
    Ok(Arc::new(MemoryKeyValueStore::new()))
}

#[linkme::distributed_slice(KV_STORE_PROVIDERS)]
static MEMORY_PROVIDER: KeyValueStoreProviderEntry = KeyValueStoreProviderEntry {
    name: "memory",
    description: "In-process store (single process only)",
    factory: memory_store_factory,
};
