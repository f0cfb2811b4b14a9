//! External Service Provider Ports

/// Key-value store provider port
pub mod kv_store;

pub use kv_store::{KeyValueStore, ensure_positive_ttl};
