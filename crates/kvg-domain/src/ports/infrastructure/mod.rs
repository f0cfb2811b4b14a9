//! Infrastructure Service Ports

/// Distributed lock port
pub mod lock;

pub use lock::LockProvider;
