//! Error handlers
//!
//! Maps credential errors onto HTTP responses.

use axum::http::StatusCode;
use log::error;

use crate::error::types::AuthError;

/// Log a credential error that the caller will only see generically
pub fn handle_error(err: &AuthError) {
    if let AuthError::Internal(detail) = err {
        error!("Auth Server Error: {}", detail);
    }
}

/// Convert error to HTTP status code
pub fn error_to_status(err: &AuthError) -> StatusCode {
    match err {
        AuthError::MissingField => StatusCode::BAD_REQUEST,
        AuthError::MalformedInput(_) => StatusCode::BAD_REQUEST,
        AuthError::DuplicateUsername(_) => StatusCode::CONFLICT,
        AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Message placed in the response body for an error
pub fn error_message(err: &AuthError) -> String {
    match err {
        AuthError::DuplicateUsername(_) => "Username already exists".to_string(),
        AuthError::Internal(_) => "Internal server error".to_string(),
        other => other.to_string(),
    }
}
