//! Composition root
//!
//! Builds every service once from configuration and hands out shared
//! handles.

pub mod bootstrap;

pub use bootstrap::{AppContext, init_app};
