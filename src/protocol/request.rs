//! Request bodies
//!
//! Both endpoints accept `{"username": ..., "password": ...}`.

use serde::Deserialize;

use crate::error::AuthError;

/// Credential pair as it arrives on the wire.
///
/// Fields are optional so that an absent field maps to `MissingField`
/// instead of a generic deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl CredentialsRequest {
    /// Splits into username and password, rejecting absent or empty fields
    pub fn into_parts(self) -> Result<(String, String), AuthError> {
        match (self.username, self.password) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Ok((username, password))
            }
            _ => Err(AuthError::MissingField),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> CredentialsRequest {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn complete_body_splits() {
        let request = parse(r#"{"username":"alice","password":"s3cret"}"#);
        assert_eq!(
            request.into_parts().unwrap(),
            ("alice".to_string(), "s3cret".to_string())
        );
    }

    #[test]
    fn absent_or_empty_fields_are_missing() {
        for body in [
            r#"{}"#,
            r#"{"username":"alice"}"#,
            r#"{"password":"s3cret"}"#,
            r#"{"username":"","password":"s3cret"}"#,
            r#"{"username":"alice","password":null}"#,
        ] {
            assert_eq!(
                parse(body).into_parts(),
                Err(AuthError::MissingField),
                "body {body}"
            );
        }
    }
}
