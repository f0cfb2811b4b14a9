//! Key-Value Store Provider Registry
//!
//! Providers register themselves into [`KV_STORE_PROVIDERS`] and are
//! resolved by name at startup.

use std::sync::Arc;

use kvg_domain::ports::KeyValueStore;

/// Configuration for store provider creation
///
/// Providers use what they need and ignore the rest.
#[derive(Debug, Clone, Default)]
pub struct StoreProviderConfig {
    /// Provider name (e.g., "memory", "redis")
    pub provider: String,
    /// Connection URI (for networked stores)
    pub uri: Option<String>,
    /// Upper bound for a single store round-trip, in milliseconds
    pub operation_timeout_ms: Option<u64>,
}

impl StoreProviderConfig {
    /// Create a new config with the given provider name
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            ..Default::default()
        }
    }

    /// Set the URI
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Set the per-operation timeout
    pub fn with_operation_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.operation_timeout_ms = Some(timeout_ms);
        self
    }
}

/// Registry entry for key-value store providers
pub struct KeyValueStoreProviderEntry {
    /// Unique provider name (e.g., "memory", "redis")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create provider instance
    pub factory: fn(&StoreProviderConfig) -> Result<Arc<dyn KeyValueStore>, String>,
}

#[linkme::distributed_slice]
pub static KV_STORE_PROVIDERS: [KeyValueStoreProviderEntry] = [..];

/// Resolve a store provider by name from the registry
///
/// # Returns
/// * `Ok(Arc<dyn KeyValueStore>)` - Created provider instance
/// * `Err(String)` - Error message if provider not found or creation failed
pub fn resolve_kv_store_provider(
    config: &StoreProviderConfig,
) -> Result<Arc<dyn KeyValueStore>, String> {
    let provider_name = &config.provider;

    if let Some(entry) = KV_STORE_PROVIDERS
        .iter()
        .find(|entry| entry.name == provider_name)
    {
        return (entry.factory)(config);
    }

    let available: Vec<&str> = KV_STORE_PROVIDERS.iter().map(|e| e.name).collect();
    Err(format!(
        "Unknown key-value store provider '{}'. Available providers: {:?}",
        provider_name, available
    ))
}

/// List all registered store providers as (name, description) pairs
pub fn list_kv_store_providers() -> Vec<(&'static str, &'static str)> {
    KV_STORE_PROVIDERS
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}
