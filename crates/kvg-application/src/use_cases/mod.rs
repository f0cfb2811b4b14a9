//! Use Case Implementations

pub mod lock_service;
pub mod read_through;
pub mod seckill;
pub mod user_service;

pub use lock_service::DistributedLockService;
pub use read_through::{CacheSettings, ReadThroughCache};
pub use seckill::{SeckillService, SeckillSettings};
pub use user_service::{UserQueryService, user_cache_key};
