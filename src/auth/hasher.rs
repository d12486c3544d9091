//! Password hashing
//!
//! The credential store only sees the `PasswordHasher` contract: a salted,
//! one-way `hash` and a `compare` that re-derives with the embedded salt.
//! Both calls are slow on purpose and must run off the async workers.

use crate::error::AuthError;

/// Salted one-way password hashing
pub trait PasswordHasher: Send + Sync {
    /// Hash `plaintext` with a fresh random salt
    fn hash(&self, plaintext: &str) -> Result<String, AuthError>;

    /// Check `plaintext` against a hash produced by `hash`
    fn compare(&self, plaintext: &str, stored_hash: &str) -> Result<bool, AuthError>;
}

/// bcrypt-backed hasher with a fixed work factor
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        bcrypt::hash(plaintext, self.cost)
            .map_err(|e| AuthError::Internal(format!("Failed to hash password: {}", e)))
    }

    fn compare(&self, plaintext: &str, stored_hash: &str) -> Result<bool, AuthError> {
        bcrypt::verify(plaintext, stored_hash)
            .map_err(|e| AuthError::Internal(format!("Failed to verify password: {}", e)))
    }
}
