//! Read-through cache configuration

use super::RetryConfig;
use kvg_application::use_cases::CacheSettings;
use kvg_domain::constants::{
    CACHE_NEGATIVE_TTL_SECS, CACHE_POSITIVE_TTL_SECS, LOCK_DEFAULT_TTL_SECS,
};
use kvg_domain::value_objects::ProtectionMode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Protection mode used by `UserQueryService::get_user`
    pub mode: ProtectionMode,
    /// Lifetime of a cached record, in seconds
    pub positive_ttl_secs: u64,
    /// Lifetime of a negative marker, in seconds
    pub negative_ttl_secs: u64,
    /// Lifetime of the per-key population lock, in seconds
    pub lock_ttl_secs: u64,
    /// Polling policy for readers that lose the population lock
    pub poll: RetryConfig,
}

impl CacheConfig {
    /// Convert to accessor settings
    pub fn settings(&self) -> CacheSettings {
        CacheSettings {
            positive_ttl: Duration::from_secs(self.positive_ttl_secs),
            negative_ttl: Duration::from_secs(self.negative_ttl_secs),
            lock_ttl: Duration::from_secs(self.lock_ttl_secs),
            poll: self.poll.policy(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            mode: ProtectionMode::default(),
            positive_ttl_secs: CACHE_POSITIVE_TTL_SECS,
            negative_ttl_secs: CACHE_NEGATIVE_TTL_SECS,
            lock_ttl_secs: LOCK_DEFAULT_TTL_SECS,
            poll: RetryConfig::default(),
        }
    }
}
