//! Error types
//!
//! Defines the credential errors surfaced to callers and the startup
//! errors that stop the server.

use std::fmt;
use std::io;

/// Credential store errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Username or password was absent or empty
    MissingField,
    /// Input present but rejected (too long, control characters, bad JSON)
    MalformedInput(String),
    DuplicateUsername(String),
    /// Unknown username or wrong password. The two cases are never told apart.
    InvalidCredentials,
    /// Hashing failure or other fault. The detail is logged, never returned.
    Internal(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingField => write!(f, "Username and password are required"),
            AuthError::MalformedInput(s) => write!(f, "Malformed input: {}", s),
            AuthError::DuplicateUsername(u) => write!(f, "Username already exists: {}", u),
            AuthError::InvalidCredentials => write!(f, "Invalid username or password"),
            AuthError::Internal(s) => write!(f, "Internal failure: {}", s),
        }
    }
}

impl std::error::Error for AuthError {}

/// Errors that abort server startup
#[derive(Debug)]
pub enum ServerError {
    Auth(AuthError),
    Config(config::ConfigError),
    IoError(io::Error),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Auth(e) => write!(f, "Authentication error: {}", e),
            ServerError::Config(e) => write!(f, "Configuration error: {}", e),
            ServerError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<AuthError> for ServerError {
    fn from(error: AuthError) -> Self {
        ServerError::Auth(error)
    }
}

impl From<config::ConfigError> for ServerError {
    fn from(error: config::ConfigError) -> Self {
        ServerError::Config(error)
    }
}

impl From<io::Error> for ServerError {
    fn from(error: io::Error) -> Self {
        ServerError::IoError(error)
    }
}
