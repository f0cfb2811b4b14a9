//! Seckill workflow configuration

use super::RetryConfig;
use crate::constants::{
    DEFAULT_SECKILL_RETRY_ATTEMPTS, DEFAULT_SECKILL_RETRY_INITIAL_BACKOFF_MS,
    DEFAULT_SECKILL_RETRY_MAX_BACKOFF_MS, DEFAULT_SECKILL_WORK_DELAY_MS,
};
use kvg_application::use_cases::SeckillSettings;
use kvg_domain::constants::{
    SECKILL_INITIAL_STOCK, SECKILL_LOCK_KEY, SECKILL_STOCK_KEY, SECKILL_STOCK_TTL_SECS,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Seckill configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeckillConfig {
    /// Key of the stock counter
    pub stock_key: String,
    /// Key of the lock serializing decrements
    pub lock_key: String,
    /// Units seeded by `init_stock` when no amount is given
    pub initial_stock: i64,
    /// Lifetime of the stock counter after every write, in seconds
    pub stock_ttl_secs: u64,
    /// Simulated work inside the critical section, in milliseconds
    pub work_delay_ms: u64,
    /// Caller-side retry of busy locks
    pub retry: RetryConfig,
}

impl SeckillConfig {
    /// Convert to service settings
    pub fn settings(&self) -> SeckillSettings {
        SeckillSettings {
            stock_ttl: Duration::from_secs(self.stock_ttl_secs),
            work_delay: Duration::from_millis(self.work_delay_ms),
        }
    }
}

impl Default for SeckillConfig {
    fn default() -> Self {
        Self {
            stock_key: SECKILL_STOCK_KEY.to_string(),
            lock_key: SECKILL_LOCK_KEY.to_string(),
            initial_stock: SECKILL_INITIAL_STOCK,
            stock_ttl_secs: SECKILL_STOCK_TTL_SECS,
            work_delay_ms: DEFAULT_SECKILL_WORK_DELAY_MS,
            retry: RetryConfig::new(
                DEFAULT_SECKILL_RETRY_ATTEMPTS,
                DEFAULT_SECKILL_RETRY_INITIAL_BACKOFF_MS,
                DEFAULT_SECKILL_RETRY_MAX_BACKOFF_MS,
            ),
        }
    }
}
