// Password hashing with bcrypt

use crate::core::errors::ServiceError;

/// Production bcrypt cost
pub const DEFAULT_COST: u32 = 10;

/// One-way password hasher.
///
/// Each call to [`PasswordHasher::hash`] draws a fresh salt. A dummy digest is
/// computed once at construction so logins for unknown usernames cost the same
/// as logins with a wrong password.
#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy_digest: String,
}

impl PasswordHasher {
    pub fn new() -> Result<Self, ServiceError> {
        Self::with_cost(DEFAULT_COST)
    }

    /// Build a hasher with a custom cost (bcrypt accepts 4..=31)
    pub fn with_cost(cost: u32) -> Result<Self, ServiceError> {
        let dummy_digest = bcrypt::hash("calendar-backend-dummy-password", cost)
            .map_err(|e| ServiceError::HashingError(e.to_string()))?;
        Ok(Self { cost, dummy_digest })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password with a fresh salt
    pub fn hash(&self, plaintext: &str) -> Result<String, ServiceError> {
        bcrypt::hash(plaintext, self.cost).map_err(|e| ServiceError::HashingError(e.to_string()))
    }

    /// Check a plaintext password against a stored digest.
    ///
    /// Malformed digests are treated as a mismatch.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        bcrypt::verify(plaintext, digest).unwrap_or(false)
    }

    /// Burn one verification against the dummy digest; always false
    pub fn verify_dummy(&self, plaintext: &str) -> bool {
        let _ = self.verify(plaintext, &self.dummy_digest);
        false
    }
}
