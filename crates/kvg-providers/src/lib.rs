//! # KV Guard - Provider Implementations
//!
//! User-selectable implementations of the domain ports.
//!
//! ## Provider Categories
//!
//! | Category | Port | Implementations |
//! |----------|------|-----------------|
//! | Key-value store | `KeyValueStore` | Memory, Redis |
//! | Repository | `UserRepository` | InMemory |
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! kvg-providers = { version = "0.1", default-features = false, features = ["store-memory"] }
//! ```
//!
//! Store providers register themselves in
//! `kvg_application::ports::registry::KV_STORE_PROVIDERS` and are picked by
//! name from configuration.

// Re-export kvg-domain types commonly used with providers
pub use kvg_domain::error::{Error, Result};
pub use kvg_domain::ports::KeyValueStore;
pub use kvg_domain::repositories::UserRepository;

/// Provider-specific constants
pub mod constants;

/// Key-value store provider implementations
pub mod store;

/// Backing-store repository implementations
pub mod repository;
