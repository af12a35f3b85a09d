// Domain error types - no storage or crypto details leak into responses

use thiserror::Error;

/// Main error type for the calendar backend
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Missing or empty required field (HTTP 400)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown username or wrong password (HTTP 400)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing or malformed Authorization header (HTTP 401)
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Token failed verification (HTTP 403)
    #[error("Forbidden: {0}")]
    Forbidden(#[from] TokenError),

    /// User, calendar or event lookup miss (HTTP 404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Calendar name already taken within the user (HTTP 409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Storage failure, including duplicate username/email at signup (HTTP 500)
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Password hashing failure (HTTP 500)
    #[error("Hashing error: {0}")]
    HashingError(String),

    /// Token could not be signed (HTTP 500)
    #[error("Token signing error: {0}")]
    SigningError(String),

    /// Configuration error (HTTP 500)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Anything else unexpected (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Token verification failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid signature")]
    InvalidToken,

    #[error("jwt expired")]
    ExpiredToken,

    #[error("jwt malformed")]
    MalformedToken,
}

impl ServiceError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 400,
            ServiceError::InvalidCredentials => 400,
            ServiceError::Unauthenticated(_) => 401,
            ServiceError::Forbidden(_) => 403,
            ServiceError::NotFound(_) => 404,
            ServiceError::Conflict(_) => 409,
            ServiceError::StorageError(_)
            | ServiceError::HashingError(_)
            | ServiceError::SigningError(_)
            | ServiceError::ConfigurationError(_)
            | ServiceError::Internal(_) => 500,
        }
    }

    /// Get user-facing error message (no internal details)
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Validation(msg) => msg.clone(),
            ServiceError::InvalidCredentials => "Invalid credentials".to_string(),
            ServiceError::Unauthenticated(msg) => msg.clone(),
            ServiceError::Forbidden(_) => "Invalid token".to_string(),
            ServiceError::NotFound(msg) => msg.clone(),
            ServiceError::Conflict(msg) => msg.clone(),
            _ => "Server error".to_string(),
        }
    }

    /// Extra detail for the response envelope, if any is safe to expose
    pub fn details(&self) -> Option<String> {
        match self {
            ServiceError::Forbidden(reason) => Some(reason.to_string()),
            _ => None,
        }
    }

    /// Whether this error is a server-side fault worth logging at error level
    pub fn is_server_fault(&self) -> bool {
        self.status_code() >= 500
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::StorageError(err.to_string())
    }
}
