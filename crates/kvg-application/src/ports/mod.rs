//! Application Ports
//!
//! Re-exports the domain ports alongside the application-owned provider
//! registry so callers have one import path.

pub mod registry;

pub use kvg_domain::ports::{KeyValueStore, LockProvider};
pub use kvg_domain::repositories::UserRepository;
