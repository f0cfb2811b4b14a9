//! Domain layer constants
//!
//! Key layouts, default TTLs and markers shared by the application layer.
//! Infrastructure-specific constants live in `kvg_infrastructure::constants`.

// ============================================================================
// CACHE DOMAIN CONSTANTS
// ============================================================================

/// Prefix for user cache keys (`user:{id}`)
pub const USER_CACHE_KEY_PREFIX: &str = "user:";

/// Prefix for per-key population locks (`lock:cache:{cache_key}`)
///
/// Kept apart from application lock keys such as `lock:seckill:1`.
pub const CACHE_LOCK_KEY_PREFIX: &str = "lock:cache:";

/// Stored value meaning "the backing store has no such record"
///
/// Never a valid JSON document, so it cannot collide with a cached record.
pub const NEGATIVE_CACHE_MARKER: &str = "";

/// Default TTL for cached records (5 minutes)
pub const CACHE_POSITIVE_TTL_SECS: u64 = 300;

/// Default TTL for negative markers (1 minute)
pub const CACHE_NEGATIVE_TTL_SECS: u64 = 60;

// ============================================================================
// LOCK DOMAIN CONSTANTS
// ============================================================================

/// Default lock lifetime in seconds
pub const LOCK_DEFAULT_TTL_SECS: u64 = 5;

/// Default number of acquire/poll rounds for waiting callers
pub const LOCK_POLL_MAX_ATTEMPTS: u32 = 10;

/// Default first backoff between poll rounds in milliseconds
pub const LOCK_POLL_INITIAL_BACKOFF_MS: u64 = 20;

/// Default backoff ceiling in milliseconds
pub const LOCK_POLL_MAX_BACKOFF_MS: u64 = 500;

// ============================================================================
// SECKILL DOMAIN CONSTANTS
// ============================================================================

/// Default stock counter key
pub const SECKILL_STOCK_KEY: &str = "seckill:stock:1";

/// Default lock key guarding the stock counter
pub const SECKILL_LOCK_KEY: &str = "lock:seckill:1";

/// Default number of units seeded by `init_stock`
pub const SECKILL_INITIAL_STOCK: i64 = 100;

/// Default stock counter TTL (24 hours)
pub const SECKILL_STOCK_TTL_SECS: u64 = 24 * 60 * 60;
