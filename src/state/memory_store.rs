// In-memory user store, used when no DATABASE_URL is configured and in tests

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::core::errors::ServiceError;
use crate::core::models::User;
use crate::state::UserStore;

/// Process-local store keyed by user id.
///
/// Enforces the same uniqueness rules as the `users` table so that signup
/// behaves identically against either backend.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert_user(&self, user: &User) -> Result<(), ServiceError> {
        let mut users = self.users.write().await;

        if users.contains_key(&user.id) {
            return Err(ServiceError::StorageError(format!(
                "duplicate key: id {}",
                user.id
            )));
        }
        if users.values().any(|u| u.username == user.username) {
            return Err(ServiceError::StorageError(format!(
                "duplicate key: username '{}'",
                user.username
            )));
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(ServiceError::StorageError(format!(
                "duplicate key: email '{}'",
                user.email
            )));
        }

        users.insert(user.id, user.clone());
        debug!(user_id = %user.id, "User inserted (memory)");
        Ok(())
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, ServiceError> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ServiceError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn save_user(&self, user: &User) -> Result<(), ServiceError> {
        let mut users = self.users.write().await;

        match users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(ServiceError::NotFound("User not found".to_string())),
        }
    }

    async fn ping(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}
