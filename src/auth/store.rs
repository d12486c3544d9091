//! Credential store
//!
//! Owns every registered identity for the lifetime of the process. Only
//! bcrypt hashes are kept; plaintext passwords live no longer than the call
//! that carries them.
//!
//! Locking: the username check and the insert in `register` happen under a
//! single write-lock acquisition, so concurrent registrations of one name
//! produce exactly one identity. Hashing and comparing run on the blocking
//! pool with no lock held.

use log::{debug, info};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use super::hasher::{BcryptHasher, PasswordHasher};
use super::identity::{Identity, IdentityId, PublicIdentity};
use super::validator::{CredentialLimits, require_fields, validate_registration};
use crate::config::ServerConfig;
use crate::error::AuthError;

/// Compared against when a login names an unknown user, so that path
/// costs the same as a wrong password.
const DECOY_PASSWORD: &str = "rax-auth-decoy-password";

pub struct CredentialStore {
    identities: RwLock<HashMap<String, Identity>>,
    hasher: Arc<dyn PasswordHasher>,
    limits: CredentialLimits,
    next_id: AtomicU64,
    decoy_hash: String,
}

/// Shared handle used by the request handlers
pub type SharedCredentialStore = Arc<CredentialStore>;

impl CredentialStore {
    pub fn new(
        hasher: Arc<dyn PasswordHasher>,
        limits: CredentialLimits,
    ) -> Result<Self, AuthError> {
        let decoy_hash = hasher.hash(DECOY_PASSWORD)?;

        Ok(Self {
            identities: RwLock::new(HashMap::new()),
            hasher,
            limits,
            next_id: AtomicU64::new(1),
            decoy_hash,
        })
    }

    /// Build a bcrypt-backed store from the server configuration
    pub fn from_config(config: &ServerConfig) -> Result<Self, AuthError> {
        Self::new(
            Arc::new(BcryptHasher::new(config.bcrypt_cost)),
            CredentialLimits::from(config),
        )
    }

    /// Whether `username` is registered (exact match)
    pub async fn exists(&self, username: &str) -> bool {
        self.identities.read().await.contains_key(username)
    }

    pub async fn len(&self) -> usize {
        self.identities.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.identities.read().await.is_empty()
    }

    /// Registers a new identity.
    ///
    /// # Errors
    ///
    /// * `MissingField` / `MalformedInput` - input failed validation.
    /// * `DuplicateUsername` - the name is already taken.
    /// * `Internal` - hashing failed; nothing was stored.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<PublicIdentity, AuthError> {
        validate_registration(username, password, &self.limits)?;

        // Early exit to skip hashing for names already taken. Not
        // authoritative; the check under the write lock is.
        if self.exists(username).await {
            return Err(AuthError::DuplicateUsername(username.to_string()));
        }

        let plaintext = password.to_owned();
        let password_hash = self
            .run_hasher(move |hasher| hasher.hash(&plaintext))
            .await?;

        let mut identities = self.identities.write().await;
        match identities.entry(username.to_string()) {
            Entry::Occupied(_) => {
                debug!("Lost registration race for {}", username);
                Err(AuthError::DuplicateUsername(username.to_string()))
            }
            Entry::Vacant(slot) => {
                let id = IdentityId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
                let identity = slot.insert(Identity::new(id, username.to_string(), password_hash));

                info!("User registered: {} (id {})", identity.username(), id);
                Ok(identity.to_public())
            }
        }
    }

    /// Checks a login attempt.
    ///
    /// Unknown usernames and wrong passwords both yield `InvalidCredentials`.
    pub async fn verify(
        &self,
        username: &str,
        password: &str,
    ) -> Result<PublicIdentity, AuthError> {
        require_fields(username, password)?;

        // bcrypt ignores bytes past its input limit, so a longer password
        // could match on its prefix alone. Nothing that long was ever stored.
        let stored = if password.len() > self.limits.max_password_length {
            None
        } else {
            let identities = self.identities.read().await;
            identities
                .get(username)
                .map(|identity| (identity.to_public(), identity.password_hash().to_string()))
        };

        let plaintext = password.to_owned();
        match stored {
            Some((public, stored_hash)) => {
                let matches = self
                    .run_hasher(move |hasher| hasher.compare(&plaintext, &stored_hash))
                    .await?;

                if matches {
                    Ok(public)
                } else {
                    Err(AuthError::InvalidCredentials)
                }
            }
            None => {
                // Result is irrelevant; only the cost of the compare matters.
                let decoy_hash = self.decoy_hash.clone();
                let _ = self
                    .run_hasher(move |hasher| hasher.compare(&plaintext, &decoy_hash))
                    .await;
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Runs a hasher call on the blocking pool
    async fn run_hasher<T, F>(&self, op: F) -> Result<T, AuthError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn PasswordHasher) -> Result<T, AuthError> + Send + 'static,
    {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || op(hasher.as_ref()))
            .await
            .map_err(|e| AuthError::Internal(format!("Hashing task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn test_store() -> CredentialStore {
        CredentialStore::new(Arc::new(BcryptHasher::new(4)), CredentialLimits::default())
            .unwrap()
    }

    /// Hashes fine once (the decoy) and fails on every later call
    struct BrokenHasher {
        calls: AtomicU64,
    }

    impl PasswordHasher for BrokenHasher {
        fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(format!("decoy:{}", plaintext.len()))
            } else {
                Err(AuthError::Internal("entropy source unavailable".into()))
            }
        }

        fn compare(&self, _plaintext: &str, _stored_hash: &str) -> Result<bool, AuthError> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn register_then_verify() {
        let store = test_store();

        let registered = store.register("alice", "s3cret").await.unwrap();
        assert_eq!(registered.username, "alice");

        let verified = store.verify("alice", "s3cret").await.unwrap();
        assert_eq!(verified, registered);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let store = test_store();
        store.register("alice", "s3cret").await.unwrap();

        let err = store.register("alice", "anything").await.unwrap_err();
        assert_eq!(err, AuthError::DuplicateUsername("alice".into()));
        assert_eq!(store.len().await, 1);

        // first password still the one that works
        assert!(store.verify("alice", "s3cret").await.is_ok());
        assert_eq!(
            store.verify("alice", "anything").await,
            Err(AuthError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let store = test_store();
        store.register("alice", "s3cret").await.unwrap();

        let wrong_password = store.verify("alice", "wrong").await.unwrap_err();
        let unknown_user = store.verify("mallory", "s3cret").await.unwrap_err();

        assert_eq!(wrong_password, AuthError::InvalidCredentials);
        assert_eq!(wrong_password, unknown_user);
    }

    #[tokio::test]
    async fn usernames_are_case_sensitive() {
        let store = test_store();
        store.register("alice", "s3cret").await.unwrap();

        assert!(!store.exists("Alice").await);
        assert_eq!(
            store.verify("Alice", "s3cret").await,
            Err(AuthError::InvalidCredentials)
        );
        assert!(store.register("Alice", "other").await.is_ok());
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn missing_fields_are_rejected() {
        let store = test_store();

        assert_eq!(store.register("", "pw").await, Err(AuthError::MissingField));
        assert_eq!(store.register("bob", "").await, Err(AuthError::MissingField));
        assert_eq!(store.verify("", "pw").await, Err(AuthError::MissingField));
        assert_eq!(store.verify("bob", "").await, Err(AuthError::MissingField));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn identical_passwords_store_distinct_hashes() {
        let store = test_store();
        store.register("alice", "shared").await.unwrap();
        store.register("bob", "shared").await.unwrap();

        {
            let identities = store.identities.read().await;
            let alice = identities["alice"].password_hash();
            let bob = identities["bob"].password_hash();
            assert_ne!(alice, bob);
            assert!(!alice.contains("shared"));
        }

        assert!(store.verify("alice", "shared").await.is_ok());
        assert!(store.verify("bob", "shared").await.is_ok());
    }

    #[tokio::test]
    async fn ids_are_unique() {
        let store = test_store();
        let mut ids = HashSet::new();
        for name in ["a", "b", "c", "d"] {
            let identity = store.register(name, "pw").await.unwrap();
            assert!(ids.insert(identity.id));
        }
    }

    #[tokio::test]
    async fn hashing_failure_stores_nothing() {
        let hasher = Arc::new(BrokenHasher {
            calls: AtomicU64::new(0),
        });
        let store = CredentialStore::new(hasher, CredentialLimits::default()).unwrap();

        let err = store.register("alice", "s3cret").await.unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));
        assert!(!store.exists("alice").await);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn from_config_applies_password_limit() {
        let config = ServerConfig {
            bcrypt_cost: 4,
            max_password_length: 8,
            ..ServerConfig::default()
        };
        let store = CredentialStore::from_config(&config).unwrap();

        assert!(store.register("alice", "12345678").await.is_ok());
        assert!(matches!(
            store.register("bob", "123456789").await,
            Err(AuthError::MalformedInput(_))
        ));
        assert_eq!(
            store.verify("alice", "123456789").await,
            Err(AuthError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn password_past_limit_never_matches_on_prefix() {
        let store = test_store();
        let password = "a".repeat(72);
        let registered = store.register("alice", &password).await.unwrap();

        let extended = format!("{password}EXTRA-WRONG-SUFFIX");
        assert_eq!(
            store.verify("alice", &extended).await,
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(store.verify("alice", &password).await, Ok(registered));
    }

    #[tokio::test]
    async fn over_long_login_fails_like_any_bad_password() {
        let store = test_store();
        store.register("alice", "s3cret").await.unwrap();

        let over_long = "b".repeat(200);
        assert_eq!(
            store.verify("alice", &over_long).await,
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            store.verify("mallory", &over_long).await,
            Err(AuthError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn ids_count_up_from_one() {
        let store = test_store();
        let first = store.register("alice", "pw").await.unwrap();
        let second = store.register("bob", "pw").await.unwrap();

        assert_eq!(first.id.as_u64(), 1);
        assert_eq!(second.id.as_u64(), 2);

        let identities = store.identities.read().await;
        assert_eq!(identities["bob"].id(), second.id);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_registration_admits_one_winner() {
        const ATTEMPTS: usize = 16;
        let store = Arc::new(test_store());

        let handles: Vec<_> = (0..ATTEMPTS)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.register("alice", &format!("pw-{i}")).await })
            })
            .collect();

        let mut successes = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(AuthError::DuplicateUsername(_)) => duplicates += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(duplicates, ATTEMPTS - 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn verifies_run_alongside_registrations() {
        let store = Arc::new(test_store());
        store.register("alice", "s3cret").await.unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let register_store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                register_store
                    .register(&format!("user{i}"), "pw")
                    .await
                    .map(|_| ())
            }));
            let verify_store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                verify_store.verify("alice", "s3cret").await.map(|_| ())
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(store.len().await, 9);
    }
}
