//! User Repository Port

use crate::error::Result;
use crate::value_objects::User;
use async_trait::async_trait;

/// Backing-store lookup for users
///
/// May be slow or expensive; that cost is what the read-through cache
/// shields.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by primary key
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;
}
