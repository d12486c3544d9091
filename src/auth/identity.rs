//! Identity records
//!
//! An `Identity` is created once per successful registration and never
//! changes afterwards. Only its public half ever leaves the store.

use serde::Serialize;
use std::fmt;

/// Opaque identifier issued by the credential store, never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct IdentityId(u64);

impl IdentityId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stored record for one registered user
pub struct Identity {
    id: IdentityId,
    username: String,
    password_hash: String,
}

impl Identity {
    pub(crate) fn new(id: IdentityId, username: String, password_hash: String) -> Self {
        Self {
            id,
            username,
            password_hash,
        }
    }

    pub fn id(&self) -> IdentityId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// The part of the identity that is safe to hand to callers
    pub fn to_public(&self) -> PublicIdentity {
        PublicIdentity {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

// Hand-written so the hash can never end up in a log line.
impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Identity as returned by `register` and `verify`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicIdentity {
    pub id: IdentityId,
    pub username: String,
}
