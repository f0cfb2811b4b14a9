//! Bounded retry policy

use crate::constants::{
    LOCK_POLL_INITIAL_BACKOFF_MS, LOCK_POLL_MAX_ATTEMPTS, LOCK_POLL_MAX_BACKOFF_MS,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Exponential backoff with a fixed number of attempts
///
/// Lock acquisition itself never waits; callers that want to wait use this
/// policy to decide how often and how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay after the first failed attempt
    pub initial_backoff: Duration,
    /// Upper bound for any single delay
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// Create a policy
    pub fn new(max_attempts: u32, initial_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            max_attempts,
            initial_backoff,
            max_backoff,
        }
    }

    /// A policy that tries exactly once
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO, Duration::ZERO)
    }

    /// Delay to wait after the given zero-based failed attempt
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.min(16)).unwrap_or(u32::MAX);
        self.initial_backoff
            .checked_mul(factor)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            LOCK_POLL_MAX_ATTEMPTS,
            Duration::from_millis(LOCK_POLL_INITIAL_BACKOFF_MS),
            Duration::from_millis(LOCK_POLL_MAX_BACKOFF_MS),
        )
    }
}
