//! HTTP protocol layer
//!
//! Request/response shapes and the handlers that invoke the credential store.

pub mod handlers;
pub mod request;
pub mod responses;

pub use handlers::{AppState, handle_login, handle_register};
pub use request::CredentialsRequest;
pub use responses::{LoginResponse, MessageResponse};
