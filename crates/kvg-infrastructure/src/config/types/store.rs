//! Key-value store configuration

use crate::constants::{DEFAULT_STORE_OPERATION_TIMEOUT_MS, DEFAULT_STORE_PROVIDER};
use kvg_application::ports::registry::StoreProviderConfig;
use serde::{Deserialize, Serialize};

/// Store provider selection and connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Registered provider name ("memory", "redis")
    pub provider: String,
    /// Redis URL (for the redis provider)
    pub redis_url: Option<String>,
    /// Upper bound for a single store round-trip, in milliseconds
    pub operation_timeout_ms: u64,
}

impl StoreConfig {
    /// Build the registry lookup for this configuration
    pub fn provider_config(&self) -> StoreProviderConfig {
        let config = StoreProviderConfig::new(&self.provider)
            .with_operation_timeout_ms(self.operation_timeout_ms);
        match &self.redis_url {
            Some(url) => config.with_uri(url),
            None => config,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_STORE_PROVIDER.to_string(),
            redis_url: None,
            operation_timeout_ms: DEFAULT_STORE_OPERATION_TIMEOUT_MS,
        }
    }
}
