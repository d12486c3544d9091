//! Authentication system
//!
//! Credential registration and verification backed by salted password hashes.

pub mod hasher;
pub mod identity;
pub mod store;
pub mod validator;

pub use hasher::{BcryptHasher, PasswordHasher};
pub use identity::{Identity, IdentityId, PublicIdentity};
pub use store::{CredentialStore, SharedCredentialStore};
pub use validator::CredentialLimits;
