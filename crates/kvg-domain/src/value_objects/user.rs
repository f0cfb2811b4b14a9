//! User record

use serde::{Deserialize, Serialize};

/// A user as returned by the backing store and cached under `user:{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Primary key
    pub id: i64,
    /// Login name
    pub username: String,
    /// Display name
    #[serde(default)]
    pub nickname: Option<String>,
    /// Contact address
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    /// Create a user with only the required fields
    pub fn new<S: Into<String>>(id: i64, username: S) -> Self {
        Self {
            id,
            username: username.into(),
            nickname: None,
            email: None,
        }
    }

    /// Set the display name
    pub fn with_nickname<S: Into<String>>(mut self, nickname: S) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    /// Set the contact address
    pub fn with_email<S: Into<String>>(mut self, email: S) -> Self {
        self.email = Some(email.into());
        self
    }
}
