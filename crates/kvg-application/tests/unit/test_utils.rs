//! Shared test doubles

#![allow(dead_code)]

use async_trait::async_trait;
use kvg_domain::error::{Error, Result};
use kvg_domain::ports::KeyValueStore;
use kvg_domain::value_objects::User;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Store whose every operation fails as if the server were down
#[derive(Debug, Default)]
pub struct UnavailableStore;

#[async_trait]
impl KeyValueStore for UnavailableStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(Error::store_unavailable("connection refused"))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<()> {
        Err(Error::store_unavailable("connection refused"))
    }

    async fn set_persistent(&self, _key: &str, _value: &str) -> Result<()> {
        Err(Error::store_unavailable("connection refused"))
    }

    async fn set_if_absent(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<bool> {
        Err(Error::store_unavailable("connection refused"))
    }

    async fn delete(&self, _key: &str) -> Result<bool> {
        Err(Error::store_unavailable("connection refused"))
    }

    fn provider_name(&self) -> &str {
        "unavailable"
    }
}

/// Loader that counts its calls and answers with a fixed record
#[derive(Debug, Clone, Default)]
pub struct CountingLoader {
    calls: Arc<AtomicUsize>,
    answer: Option<User>,
    latency: Duration,
}

impl CountingLoader {
    pub fn returning(answer: Option<User>) -> Self {
        Self {
            answer,
            ..Self::default()
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// A one-shot loader closure for the accessor
    pub fn loader(
        &self,
    ) -> impl FnOnce() -> std::pin::Pin<Box<dyn Future<Output = Result<Option<User>>> + Send>>
    + Send
    + 'static {
        let calls = Arc::clone(&self.calls);
        let answer = self.answer.clone();
        let latency = self.latency;
        move || {
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                if !latency.is_zero() {
                    tokio::time::sleep(latency).await;
                }
                Ok(answer)
            })
        }
    }
}

pub fn alice() -> User {
    User::new(1, "alice").with_nickname("Alice")
}
