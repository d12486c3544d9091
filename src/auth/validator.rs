//! Credential input validation
//!
//! Rejects absent, oversized or control-character input before any hashing
//! or locking happens.

use crate::config::ServerConfig;
use crate::error::AuthError;

/// Length limits applied to incoming credentials
#[derive(Debug, Clone, Copy)]
pub struct CredentialLimits {
    pub max_username_length: usize,
    pub max_password_length: usize,
}

impl From<&ServerConfig> for CredentialLimits {
    fn from(config: &ServerConfig) -> Self {
        Self {
            max_username_length: config.max_username_length,
            max_password_length: config.max_password_length,
        }
    }
}

impl Default for CredentialLimits {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

/// Fails with `MissingField` when either value is empty
pub fn require_fields(username: &str, password: &str) -> Result<(), AuthError> {
    if username.is_empty() || password.is_empty() {
        return Err(AuthError::MissingField);
    }
    Ok(())
}

/// Validates a username/password pair offered for registration.
///
/// Usernames are compared byte for byte everywhere, so no trimming or case
/// folding happens here; a padded name is rejected instead of rewritten.
pub fn validate_registration(
    username: &str,
    password: &str,
    limits: &CredentialLimits,
) -> Result<(), AuthError> {
    require_fields(username, password)?;

    if username.trim().is_empty() || username.trim() != username {
        return Err(AuthError::MalformedInput(
            "Username cannot start or end with whitespace".into(),
        ));
    }

    if username.chars().any(char::is_control) {
        return Err(AuthError::MalformedInput(
            "Username contains control characters".into(),
        ));
    }

    if username.len() > limits.max_username_length {
        return Err(AuthError::MalformedInput(format!(
            "Username exceeds {} bytes",
            limits.max_username_length
        )));
    }

    // bcrypt stops reading at the first NUL byte
    if password.contains('\0') {
        return Err(AuthError::MalformedInput(
            "Password contains a NUL character".into(),
        ));
    }

    if password.len() > limits.max_password_length {
        return Err(AuthError::MalformedInput(format!(
            "Password exceeds {} bytes",
            limits.max_password_length
        )));
    }

    Ok(())
}
