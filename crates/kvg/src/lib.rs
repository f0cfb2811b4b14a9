//! # KV Guard
//!
//! Distributed mutual exclusion and cache protection over a shared
//! key-value store.
//!
//! ## Features
//!
//! - **Distributed lock**: token-owned, TTL-bounded, safe to release and renew
//! - **Read-through cache**: negative caching against penetration, a per-key
//!   lock against stampedes
//! - **Seckill**: lock-serialized stock decrement that never oversells
//! - **Pluggable stores**: in-process (DashMap) or Redis, picked by config
//!
//! ## Example
//!
//! ```ignore
//! use kvg::infrastructure::{ConfigLoader, di::init_app};
//!
//! let context = init_app(ConfigLoader::new().load()?)?;
//! let user = context.users().get_user(1).await?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - Ports, value objects and errors
//! - `application` - Lock, cache, seckill and user use cases
//! - `infrastructure` - Configuration, logging, composition root
//! - `providers` - Store and repository implementations

/// Domain layer - core types and ports
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use kvg_domain::*;
}

/// Application layer - use cases
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use kvg_application::*;
}

/// Infrastructure layer - config, logging and composition root
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use kvg_infrastructure::*;
}

/// Provider implementations
///
/// Re-exports from the providers crate for convenience
pub mod providers {
    pub use kvg_providers::*;
}

/// Command line interface
pub mod cli;

pub use kvg_domain::error::{Error, Result};
