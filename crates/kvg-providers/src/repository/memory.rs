//! In-memory user repository
//!
//! Stands in for the relational store the cache protects. Every lookup is
//! counted, which is how tests and the CLI observe penetration.

use crate::constants::SAMPLE_USERS;
use async_trait::async_trait;
use dashmap::DashMap;
use kvg_domain::error::Result;
use kvg_domain::repositories::UserRepository;
use kvg_domain::value_objects::User;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// User repository held in process memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<DashMap<i64, User>>,
    lookups: Arc<AtomicU64>,
    latency: Duration,
}

impl InMemoryUserRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository preloaded with a few demo users
    pub fn with_sample_users() -> Self {
        let repository = Self::new();
        for (id, username, nickname) in SAMPLE_USERS {
            repository.insert(
                User::new(*id, *username)
                    .with_nickname(*nickname)
                    .with_email(format!("{username}@example.com")),
            );
        }
        repository
    }

    /// Simulate a slow backing store
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Add or replace a user
    pub fn insert(&self, user: User) {
        self.users.insert(user.id, user);
    }

    /// How many times `find_by_id` has been called
    pub fn lookup_count(&self) -> u64 {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let user = self.users.get(&id).map(|entry| entry.value().clone());
        debug!(id, found = user.is_some(), "User repository lookup");
        Ok(user)
    }
}
