//! Repository Interfaces
//!
//! Backing-store lookups that the read-through cache protects.

/// User repository port
pub mod user_repository;

pub use user_repository::UserRepository;
