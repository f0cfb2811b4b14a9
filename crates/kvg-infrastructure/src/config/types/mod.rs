//! Configuration types module

pub mod app;
pub mod cache;
pub mod lock;
pub mod logging;
pub mod retry;
pub mod seckill;
pub mod store;

// Re-export main types
pub use app::AppConfig;
pub use cache::CacheConfig;
pub use lock::LockConfig;
pub use logging::LoggingConfig;
pub use retry::RetryConfig;
pub use seckill::SeckillConfig;
pub use store::StoreConfig;
