//! Seckill outcomes

use serde::{Deserialize, Serialize};

/// Result of one `decrement_if_positive` attempt
///
/// Store faults are reported through `Err` instead; every variant here is a
/// normal business answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DecrementOutcome {
    /// One unit was taken; `remaining` units are left
    Success {
        /// Stock left after this purchase
        remaining: i64,
    },
    /// Another buyer holds the stock lock
    LockBusy,
    /// No stock left (or never seeded)
    Depleted,
}

impl DecrementOutcome {
    /// Whether retrying later could change the answer
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LockBusy)
    }

    /// User-facing message
    pub fn message(&self) -> String {
        match self {
            Self::Success { remaining } => {
                format!("Purchase succeeded, {remaining} left in stock")
            }
            Self::LockBusy => "Too many concurrent buyers, please retry".to_string(),
            Self::Depleted => "Sold out".to_string(),
        }
    }
}
