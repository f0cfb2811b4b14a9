//! Value Objects
//!
//! Immutable types exchanged between ports and use cases.

/// Cache lookups, protection modes and statistics
pub mod cache;
/// Lock ownership tokens and guards
pub mod lock;
/// Bounded retry/backoff policy
pub mod retry;
/// Seckill decrement outcomes
pub mod seckill;
/// User record
pub mod user;

pub use cache::{CacheLookup, CacheStats, ProtectionMode};
pub use lock::{LockGuard, LockToken};
pub use retry::RetryPolicy;
pub use seckill::DecrementOutcome;
pub use user::User;
