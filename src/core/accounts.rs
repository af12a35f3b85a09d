// Signup and login

use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::audit_logger::{AuditContext, AuditLogger, AuthEvent};
use crate::auth::credentials::Password;
use crate::auth::password::PasswordHasher;
use crate::auth::token::TokenService;
use crate::core::errors::ServiceError;
use crate::core::models::{non_empty, User};
use crate::state::UserStore;

/// Account operations on top of the user store, hasher and token issuer
pub struct AccountService {
    store: Arc<dyn UserStore + Send + Sync>,
    hasher: Arc<PasswordHasher>,
    tokens: Arc<TokenService>,
    audit_logger: Arc<AuditLogger>,
}

impl AccountService {
    pub fn new(
        store: Arc<dyn UserStore + Send + Sync>,
        hasher: Arc<PasswordHasher>,
        tokens: Arc<TokenService>,
        audit_logger: Arc<AuditLogger>,
    ) -> Self {
        Self {
            store,
            hasher,
            tokens,
            audit_logger,
        }
    }

    /// Register a new user with no calendars.
    ///
    /// A duplicate username or email comes back from the store as a
    /// `StorageError` and is reported as a generic server error.
    pub async fn signup(
        &self,
        username: Option<String>,
        email: Option<String>,
        password: Option<Password>,
    ) -> Result<User, ServiceError> {
        let username = non_empty(username)
            .ok_or_else(|| ServiceError::Validation("Username is required".to_string()))?;
        let email = non_empty(email)
            .ok_or_else(|| ServiceError::Validation("Email is required".to_string()))?;
        let password = password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ServiceError::Validation("Password is required".to_string()))?;

        let password_hash = self.hash(password).await?;
        let user = User::new(username, email, password_hash);
        self.store.insert_user(&user).await?;

        info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user)
    }

    /// Check credentials and issue a one-hour token.
    ///
    /// Unknown usernames and wrong passwords produce the same error and cost
    /// one bcrypt verification either way.
    pub async fn login(
        &self,
        username: Option<String>,
        password: Option<Password>,
        context: AuditContext,
    ) -> Result<String, ServiceError> {
        let (username, password) = match (non_empty(username), password) {
            (Some(u), Some(p)) if !p.is_empty() => (u, p),
            _ => {
                return Err(ServiceError::Validation(
                    "Username and password are required".to_string(),
                ))
            }
        };

        let context = AuditContext {
            subject: Some(username.clone()),
            ..context
        };

        let user = self.store.find_by_username(&username).await?;
        let digest = user.as_ref().map(|u| u.password_hash.clone());

        if !self.verify(password, digest).await? {
            self.audit_logger.log_auth_event(
                AuthEvent::LoginFailure {
                    reason: "Invalid credentials".to_string(),
                },
                context,
            );
            return Err(ServiceError::InvalidCredentials);
        }

        // verify() only returns true when a digest, hence a user, was present
        let user = user.ok_or(ServiceError::InvalidCredentials)?;
        let token = self.tokens.issue(user.id)?;

        self.audit_logger
            .log_auth_event(AuthEvent::LoginSuccess, context);
        Ok(token)
    }

    async fn hash(&self, password: Password) -> Result<String, ServiceError> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(password.expose_secret()))
            .await
            .map_err(|e| ServiceError::Internal(format!("Hashing task failed: {}", e)))?
    }

    async fn verify(&self, password: Password, digest: Option<String>) -> Result<bool, ServiceError> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || match digest {
            Some(digest) => hasher.verify(password.expose_secret(), &digest),
            None => hasher.verify_dummy(password.expose_secret()),
        })
        .await
        .map_err(|e| {
            warn!(error = %e, "Password verification task failed");
            ServiceError::Internal(format!("Verification task failed: {}", e))
        })
    }
}
