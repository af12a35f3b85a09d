// Credential store: persistence of whole user aggregates

pub mod memory_store;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::errors::ServiceError;
use crate::core::models::User;

/// Storage for user aggregates.
///
/// Every write replaces the whole aggregate (credentials, calendars and
/// events). There is no version check between a load and the following save,
/// so two concurrent writers for the same user can overwrite each other.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Duplicate usernames or emails fail with `StorageError`.
    async fn insert_user(&self, user: &User) -> Result<(), ServiceError>;

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, ServiceError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ServiceError>;

    /// Rewrite an existing aggregate. Fails with `NotFound` if the user is gone.
    async fn save_user(&self, user: &User) -> Result<(), ServiceError>;

    /// Cheap connectivity check for the health endpoint
    async fn ping(&self) -> Result<(), ServiceError>;
}

pub use memory_store::InMemoryUserStore;
