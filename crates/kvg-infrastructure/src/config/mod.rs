//! Configuration management
//!
//! Layered configuration built with Figment: compiled-in defaults, then an
//! optional TOML file, then `KVG__`-prefixed environment variables.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::*;
