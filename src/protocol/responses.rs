//! HTTP responses
//!
//! Response bodies and the mapping of `AuthError` onto them.

use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::auth::PublicIdentity;
use crate::error::AuthError;
use crate::error::handlers::{error_message, error_to_status, handle_error};

pub const MSG_REGISTERED: &str = "User registered successfully";
pub const MSG_LOGIN_SUCCESS: &str = "Login successful";

/// Body carrying only a human-readable message
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of a successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: PublicIdentity,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        handle_error(&self);
        let body = MessageResponse::new(error_message(&self));
        (error_to_status(&self), Json(body)).into_response()
    }
}
