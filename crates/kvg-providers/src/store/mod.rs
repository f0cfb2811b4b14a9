//! Key-Value Store Implementations
//!
//! ## Available Providers
//!
//! | Provider | Type | Description |
//! |----------|------|-------------|
//! | [`MemoryKeyValueStore`] | Local | DashMap with lazy TTL expiry |
//! | [`RedisKeyValueStore`] | Distributed | Redis-backed for multi-process |
//!
//! ## Provider Selection Guide
//!
//! - **Development/Testing**: `MemoryKeyValueStore`
//! - **Multiple processes**: `RedisKeyValueStore`; a lock is only as shared
//!   as the store it lives in

#[cfg(feature = "store-memory")]
pub mod memory;
#[cfg(feature = "store-redis")]
pub mod redis;

#[cfg(feature = "store-memory")]
pub use memory::MemoryKeyValueStore;
#[cfg(feature = "store-redis")]
pub use self::redis::RedisKeyValueStore;
