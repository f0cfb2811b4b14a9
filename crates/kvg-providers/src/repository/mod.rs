//! Repository Implementations
//!
//! Backing stores for the read-through cache.

pub mod memory;

pub use memory::InMemoryUserRepository;
