//! Request handlers for the RAX auth server.
//!
//! Each handler unpacks the JSON body, calls the credential store and turns
//! the outcome into a status code plus JSON message.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use log::{info, warn};

use crate::auth::SharedCredentialStore;
use crate::error::AuthError;
use crate::protocol::request::CredentialsRequest;
use crate::protocol::responses::{LoginResponse, MSG_LOGIN_SUCCESS, MSG_REGISTERED, MessageResponse};

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: SharedCredentialStore,
}

/// Unwraps the JSON body, rejecting anything that is not a credentials object
fn credentials_from(
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(String, String), AuthError> {
    let Json(request) = payload.map_err(|rejection| {
        AuthError::MalformedInput(format!("Invalid request body: {}", rejection.body_text()))
    })?;
    request.into_parts()
}

/// Handles `POST /register`: stores a new identity.
pub async fn handle_register(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AuthError> {
    let (username, password) = credentials_from(payload)?;

    state.store.register(&username, &password).await?;

    Ok((StatusCode::CREATED, Json(MessageResponse::new(MSG_REGISTERED))))
}

/// Handles `POST /login`: checks the credentials and returns the public identity.
pub async fn handle_login(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AuthError> {
    let (username, password) = credentials_from(payload)?;

    match state.store.verify(&username, &password).await {
        Ok(user) => {
            info!("User logged in: {}", user.username);
            Ok(Json(LoginResponse {
                message: MSG_LOGIN_SUCCESS.to_string(),
                user,
            }))
        }
        Err(AuthError::InvalidCredentials) => {
            warn!("Failed login attempt for {}", username);
            Err(AuthError::InvalidCredentials)
        }
        Err(e) => Err(e),
    }
}
