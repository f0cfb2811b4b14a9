//! User Query Use Case
//!
//! User lookup by id through the read-through cache.

use crate::use_cases::read_through::ReadThroughCache;
use kvg_domain::constants::USER_CACHE_KEY_PREFIX;
use kvg_domain::error::Result;
use kvg_domain::repositories::UserRepository;
use kvg_domain::value_objects::{ProtectionMode, User};
use std::sync::Arc;

/// Cache key for a user id
#[inline]
pub fn user_cache_key(id: i64) -> String {
    format!("{USER_CACHE_KEY_PREFIX}{id}")
}

/// User lookups shielded by the read-through cache
#[derive(Clone)]
pub struct UserQueryService {
    cache: ReadThroughCache,
    repository: Arc<dyn UserRepository>,
    mode: ProtectionMode,
}

impl UserQueryService {
    /// Create a service reading in `mode` unless told otherwise
    pub fn new(
        cache: ReadThroughCache,
        repository: Arc<dyn UserRepository>,
        mode: ProtectionMode,
    ) -> Self {
        Self {
            cache,
            repository,
            mode,
        }
    }

    /// Configured protection mode
    pub fn mode(&self) -> ProtectionMode {
        self.mode
    }

    /// The accessor in front of the repository
    pub fn cache(&self) -> &ReadThroughCache {
        &self.cache
    }

    /// Look up a user with the configured protection mode
    pub async fn get_user(&self, id: i64) -> Result<Option<User>> {
        self.get_user_with_mode(id, self.mode).await
    }

    /// Look up a user with an explicit protection mode
    pub async fn get_user_with_mode(&self, id: i64, mode: ProtectionMode) -> Result<Option<User>> {
        let repository = Arc::clone(&self.repository);
        self.cache
            .read_with_mode(mode, &user_cache_key(id), move || async move {
                repository.find_by_id(id).await
            })
            .await
    }

    /// Remove a raw key from the cache
    pub async fn clear_cache(&self, key: &str) -> Result<bool> {
        self.cache.invalidate(key).await
    }
}

impl std::fmt::Debug for UserQueryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserQueryService")
            .field("cache", &self.cache)
            .field("mode", &self.mode)
            .finish()
    }
}
