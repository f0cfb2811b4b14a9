//! Top-level application configuration

use super::{CacheConfig, LockConfig, LoggingConfig, SeckillConfig, StoreConfig};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Shared key-value store
    pub store: StoreConfig,
    /// Read-through cache
    pub cache: CacheConfig,
    /// Distributed lock defaults
    pub lock: LockConfig,
    /// Seckill workflow
    pub seckill: SeckillConfig,
    /// Logging
    pub logging: LoggingConfig,
}
