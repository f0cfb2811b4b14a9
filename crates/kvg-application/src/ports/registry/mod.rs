//! Provider Registry System
//!
//! Compile-time registration of key-value store providers via `linkme`.
//!
//! ```text
//! 1. Provider defines:  #[linkme::distributed_slice(KV_STORE_PROVIDERS)]
//!                       static ENTRY: KeyValueStoreProviderEntry = ...
//! 2. Registry declares: #[linkme::distributed_slice]
//!                       pub static KV_STORE_PROVIDERS: [Entry] = [..]
//! 3. Resolver queries:  KV_STORE_PROVIDERS.iter()
//! 4. Config selects:    "provider = redis" -> RedisKeyValueStore
//! ```
//!
//! ## Registering a Provider (in kvg-providers)
//!
//! ```ignore
//! use kvg_application::ports::registry::{KeyValueStoreProviderEntry, KV_STORE_PROVIDERS};
//!
//! #[linkme::distributed_slice(KV_STORE_PROVIDERS)]
//! static MEMORY_PROVIDER: KeyValueStoreProviderEntry = KeyValueStoreProviderEntry {
//!     name: "memory",
//!     description: "In-process store",
//!     factory: |_config| Ok(Arc::new(MemoryKeyValueStore::new())),
//! };
//! ```

pub mod kv_store;

pub use kv_store::{
    KV_STORE_PROVIDERS, KeyValueStoreProviderEntry, StoreProviderConfig,
    list_kv_store_providers, resolve_kv_store_provider,
};
