//! # KV Guard - Domain Layer
//!
//! Core types and boundary contracts for distributed locking and cache
//! protection over a shared key-value store.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Domain error type and `Result` alias |
//! | [`constants`] | Default keys, TTLs and markers |
//! | [`value_objects`] | Lock tokens, guards, cache lookups, outcomes, records |
//! | [`ports`] | Store and lock contracts implemented by outer layers |
//! | [`repositories`] | Backing-store lookup contracts |
//!
//! The domain crate holds no state of its own. Everything persistent lives
//! in the store behind [`ports::KeyValueStore`].

/// Domain constants
pub mod constants;
/// Error handling types
pub mod error;
/// Port interfaces implemented by providers and services
pub mod ports;
/// Repository interfaces for backing-store lookups
pub mod repositories;
/// Immutable value types
pub mod value_objects;

pub use error::{Error, Result};
