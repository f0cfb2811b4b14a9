//! Infrastructure constants
//!
//! Defaults for configuration, logging and the store connection. Protocol
//! defaults (TTLs, keys, markers) live in `kvg_domain::constants`.

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "kvg.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "kvg";

/// Environment variable prefix; nested keys are joined with `__`
pub const CONFIG_ENV_PREFIX: &str = "KVG";

/// Separator between the prefix and nested key segments in env vars
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// STORE
// ============================================================================

/// Store provider used when none is configured
pub const DEFAULT_STORE_PROVIDER: &str = "memory";

/// Upper bound for a single store round-trip, in milliseconds
pub const DEFAULT_STORE_OPERATION_TIMEOUT_MS: u64 = 2000;

// ============================================================================
// SECKILL DEMO
// ============================================================================

/// Simulated business work inside the seckill critical section
pub const DEFAULT_SECKILL_WORK_DELAY_MS: u64 = 100;

/// Attempts made by `purchase_with_retry`
pub const DEFAULT_SECKILL_RETRY_ATTEMPTS: u32 = 50;

/// First backoff between purchase retries
pub const DEFAULT_SECKILL_RETRY_INITIAL_BACKOFF_MS: u64 = 10;

/// Backoff ceiling between purchase retries
pub const DEFAULT_SECKILL_RETRY_MAX_BACKOFF_MS: u64 = 200;

// ============================================================================
// LOGGING
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable that overrides the configured log filter
pub const LOG_ENV_VAR: &str = "KVG_LOG";

/// File name stem for rolling log files
pub const LOG_FILE_PREFIX: &str = "kvg";
