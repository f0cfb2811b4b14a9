//! Redis key-value store provider
//!
//! Shared store for multi-process deployments.
//!
//! ## Features
//!
//! - `SET NX PX` for atomic acquisition
//! - Lua scripts for owner-checked delete and TTL refresh
//! - One lazily created `ConnectionManager` shared by all clones
//! - Every round-trip bounded by the operation timeout
//!
//! ## Example
//!
//! ```ignore
//! use kvg_providers::store::RedisKeyValueStore;
//!
//! let store = RedisKeyValueStore::new("redis://localhost:6379")?;
//! ```

use crate::constants::{
    REDIS_COMPARE_AND_DELETE_SCRIPT, REDIS_DEFAULT_URL, REDIS_OPERATION_TIMEOUT_MS,
    REDIS_REFRESH_IF_EQUALS_SCRIPT,
};
use async_trait::async_trait;
use kvg_domain::error::{Error, Result};
use kvg_domain::ports::providers::{KeyValueStore, ensure_positive_ttl};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisResult, Script};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

/// Redis key-value store
#[derive(Clone)]
pub struct RedisKeyValueStore {
    client: Client,
    connection: Arc<OnceCell<ConnectionManager>>,
    operation_timeout: Duration,
    compare_and_delete: Arc<Script>,
    refresh_if_equals: Arc<Script>,
}

impl RedisKeyValueStore {
    /// Create a store for `connection_string`
    ///
    /// No connection is made until the first operation.
    pub fn new(connection_string: &str) -> Result<Self> {
        let client = Client::open(connection_string).map_err(|e| Error::Infrastructure {
            message: format!("Failed to create Redis client: {e}"),
            source: Some(Box::new(e)),
        })?;

        Ok(Self {
            client,
            connection: Arc::new(OnceCell::new()),
            operation_timeout: Duration::from_millis(REDIS_OPERATION_TIMEOUT_MS),
            compare_and_delete: Arc::new(Script::new(REDIS_COMPARE_AND_DELETE_SCRIPT)),
            refresh_if_equals: Arc::new(Script::new(REDIS_REFRESH_IF_EQUALS_SCRIPT)),
        })
    }

    /// Override the per-operation timeout
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// Per-operation timeout
    pub fn operation_timeout(&self) -> Duration {
        self.operation_timeout
    }

    async fn connection(&self) -> Result<ConnectionManager> {
        let manager = self
            .connection
            .get_or_try_init(|| {
                self.timed("CONNECT", ConnectionManager::new(self.client.clone()))
            })
            .await?;
        Ok(manager.clone())
    }

    async fn timed<T, F>(&self, operation: &str, fut: F) -> Result<T>
    where
        F: Future<Output = RedisResult<T>>,
    {
        match tokio::time::timeout(self.operation_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(Error::store_unavailable_with_source(
                format!("Redis {operation} failed: {e}"),
                e,
            )),
            Err(_) => Err(Error::store_unavailable(format!(
                "Redis {operation} timed out after {}ms",
                self.operation_timeout.as_millis()
            ))),
        }
    }
}

fn ttl_millis(ttl: Duration) -> Result<u64> {
    ensure_positive_ttl(ttl)?;
    Ok(u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1))
}

#[async_trait]
impl KeyValueStore for RedisKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;
        self.timed("GET", conn.get::<_, Option<String>>(key)).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let millis = ttl_millis(ttl)?;
        let mut conn = self.connection().await?;
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value).arg("PX").arg(millis);
        self.timed("SET", cmd.query_async::<()>(&mut conn)).await
    }

    async fn set_persistent(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.connection().await?;
        self.timed("SET", conn.set::<_, _, ()>(key, value)).await
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        let millis = ttl_millis(ttl)?;
        let mut conn = self.connection().await?;
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value).arg("NX").arg("PX").arg(millis);
        let reply = self
            .timed("SET NX", cmd.query_async::<Option<String>>(&mut conn))
            .await?;
        Ok(reply.is_some())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection().await?;
        let removed = self.timed("DEL", conn.del::<_, i64>(key)).await?;
        Ok(removed > 0)
    }

    async fn compare_and_delete(&self, key: &str, expected: &str) -> Result<bool> {
        let mut conn = self.connection().await?;
        let mut invocation = self.compare_and_delete.key(key);
        invocation.arg(expected);
        let removed = self
            .timed("compare-and-delete", invocation.invoke_async::<i64>(&mut conn))
            .await?;
        Ok(removed > 0)
    }

    async fn refresh_if_equals(&self, key: &str, expected: &str, ttl: Duration) -> Result<bool> {
        let millis = ttl_millis(ttl)?;
        let mut conn = self.connection().await?;
        let mut invocation = self.refresh_if_equals.key(key);
        invocation.arg(expected).arg(millis);
        let refreshed = self
            .timed("refresh-if-equals", invocation.invoke_async::<i64>(&mut conn))
            .await?;
        Ok(refreshed > 0)
    }

    fn provider_name(&self) -> &str {
        "redis"
    }
}

impl std::fmt::Debug for RedisKeyValueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisKeyValueStore")
            .field("connected", &self.connection.initialized())
            .field("operation_timeout", &self.operation_timeout)
            .finish()
    }
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

use kvg_application::ports::registry::{
    KV_STORE_PROVIDERS, KeyValueStoreProviderEntry, StoreProviderConfig,
};

/// Factory function for creating Redis store instances.
fn redis_store_factory(
    config: &StoreProviderConfig,
) -> std::result::Result<Arc<dyn KeyValueStore>, String> {
    let uri = config.uri.as_deref().unwrap_or(REDIS_DEFAULT_URL);

    let mut store =
        RedisKeyValueStore::new(uri).map_err(|e| format!("Failed to create Redis provider: {e}"))?;
    if let Some(timeout_ms) = config.operation_timeout_ms {
        store = store.with_operation_timeout(Duration::from_millis(timeout_ms));
    }

    Ok(Arc::new(store))
}

#[linkme::distributed_slice(KV_STORE_PROVIDERS)]
static REDIS_PROVIDER: KeyValueStoreProviderEntry = KeyValueStoreProviderEntry {
    name: "redis",
    description: "Redis shared store (multi-process)",
    factory: redis_store_factory,
};
