//! Application Layer - KV Guard
//!
//! Use cases that coordinate independent processes through a shared
//! key-value store.
//!
//! ## Use Cases
//!
//! - [`DistributedLockService`]: token-owned locks with TTL self-healing
//! - [`ReadThroughCache`]: cache-first reads with negative caching and
//!   lock-guarded population
//! - [`SeckillService`]: stock decrement serialized by a lock
//! - [`UserQueryService`]: user lookup through the read-through cache
//!
//! ## Ports
//!
//! - `ports::registry`: compile-time registry of key-value store providers
//!
//! ## Dependencies
//!
//! This crate depends only on:
//! - `kvg-domain`: ports, value objects and errors
//! - Pure Rust libraries for async, serialization, etc.

pub mod ports;
pub mod use_cases;

pub use use_cases::*;
