//! Domain Port Interfaces
//!
//! Boundary contracts between the domain and the outer layers:
//! - High-level modules (use cases) depend on these traits
//! - Low-level modules (providers) implement them
//!
//! ## Organization
//!
//! - **providers/** - External store providers (key-value store)
//! - **infrastructure/** - Coordination services built on the store (locks)

/// Infrastructure service ports
pub mod infrastructure;
/// External service provider ports
pub mod providers;

pub use infrastructure::LockProvider;
pub use providers::KeyValueStore;
