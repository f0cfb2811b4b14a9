//! Application context bootstrap
//!
//! The store provider is resolved by name through the linkme registry; every
//! service is built once on top of it and shared.
//!
//! ```text
//! AppConfig → registry (linkme) → Arc<dyn KeyValueStore>
//!                                      ↓
//!        DistributedLockService · ReadThroughCache · SeckillService
//!                                      ↓
//!                              UserQueryService
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let context = init_app(ConfigLoader::new().load()?)?;
//! let outcome = context
//!     .seckill()
//!     .decrement_if_positive(&stock_key, &lock_key, context.lock_ttl())
//!     .await?;
//! ```

use crate::config::AppConfig;
use kvg_application::ports::registry::{list_kv_store_providers, resolve_kv_store_provider};
use kvg_application::use_cases::{
    DistributedLockService, ReadThroughCache, SeckillService, UserQueryService,
};
use kvg_domain::error::{Error, Result};
use kvg_domain::ports::KeyValueStore;
use kvg_domain::repositories::UserRepository;
use kvg_providers::repository::InMemoryUserRepository;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Application context holding the store and the services built on it
#[derive(Clone)]
pub struct AppContext {
    /// Application configuration
    pub config: Arc<AppConfig>,

    store: Arc<dyn KeyValueStore>,
    locks: DistributedLockService,
    cache: ReadThroughCache,
    seckill: SeckillService,
    users: UserQueryService,
    repository: InMemoryUserRepository,
}

impl AppContext {
    /// Build the context, resolving the store provider from configuration
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let provider_config = config.store.provider_config();
        let store = resolve_kv_store_provider(&provider_config).map_err(Error::config)?;
        info!(provider = store.provider_name(), "Resolved key-value store");
        Ok(Self::with_store(config, store))
    }

    /// Build the context around an already constructed store
    pub fn with_store(config: AppConfig, store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_components(config, store, InMemoryUserRepository::with_sample_users())
    }

    /// Build the context from explicit parts
    pub fn with_components(
        config: AppConfig,
        store: Arc<dyn KeyValueStore>,
        repository: InMemoryUserRepository,
    ) -> Self {
        let locks = DistributedLockService::new(Arc::clone(&store));
        let cache = ReadThroughCache::with_settings(Arc::clone(&store), config.cache.settings());
        let seckill = SeckillService::with_settings(Arc::clone(&store), config.seckill.settings());
        let user_repository: Arc<dyn UserRepository> = Arc::new(repository.clone());
        let users = UserQueryService::new(cache.clone(), user_repository, config.cache.mode);

        Self {
            config: Arc::new(config),
            store,
            locks,
            cache,
            seckill,
            users,
            repository,
        }
    }

    /// Shared key-value store
    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.store)
    }

    /// Distributed lock service
    pub fn locks(&self) -> &DistributedLockService {
        &self.locks
    }

    /// Read-through cache accessor
    pub fn cache(&self) -> &ReadThroughCache {
        &self.cache
    }

    /// Seckill workflow
    pub fn seckill(&self) -> &SeckillService {
        &self.seckill
    }

    /// User lookups through the cache
    pub fn users(&self) -> &UserQueryService {
        &self.users
    }

    /// Backing repository behind [`Self::users`]
    pub fn user_repository(&self) -> &InMemoryUserRepository {
        &self.repository
    }

    /// Default lock TTL from configuration
    pub fn lock_ttl(&self) -> Duration {
        self.config.lock.default_ttl()
    }

    /// Registered store providers as (name, description) pairs
    pub fn available_store_providers() -> Vec<(&'static str, &'static str)> {
        list_kv_store_providers()
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("store", &self.store.provider_name())
            .field("cache_mode", &self.config.cache.mode)
            .finish_non_exhaustive()
    }
}

/// Initialize the application context from configuration
///
/// Providers are registered through linkme distributed slices when
/// kvg-providers is linked; no explicit registration call is needed.
pub fn init_app(config: AppConfig) -> Result<AppContext> {
    info!("Initializing application context");
    AppContext::from_config(config)
}
