//! User lookup and credential verification.
//!
//! # Spring Security Equivalent
//! `UserDetailsService`, `UserDetailsManager`, `DaoAuthenticationProvider`

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use actix_web::web;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::http::security::crypto::PasswordEncoder;
use crate::http::security::User;

/// Errors raised while loading, managing or authenticating users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserDetailsError {
    NotFound,
    AlreadyExists,
    /// Unknown user or wrong password; the two are not distinguished.
    BadCredentials,
    AccountDisabled,
    StorageError(String),
}

impl fmt::Display for UserDetailsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserDetailsError::NotFound => write!(f, "User not found"),
            UserDetailsError::AlreadyExists => write!(f, "User already exists"),
            UserDetailsError::BadCredentials => write!(f, "Bad credentials"),
            UserDetailsError::AccountDisabled => write!(f, "Account is disabled"),
            UserDetailsError::StorageError(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl std::error::Error for UserDetailsError {}

/// Loads users by name from any backing store.
#[async_trait]
pub trait UserDetailsService: Send + Sync {
    async fn load_user_by_username(&self, username: &str)
        -> Result<Option<User>, UserDetailsError>;

    async fn user_exists(&self, username: &str) -> Result<bool, UserDetailsError> {
        Ok(self.load_user_by_username(username).await?.is_some())
    }
}

/// User management on top of lookup.
#[async_trait]
pub trait UserDetailsManager: UserDetailsService {
    async fn create_user(&self, user: User) -> Result<(), UserDetailsError>;

    async fn delete_user(&self, username: &str) -> Result<(), UserDetailsError>;

    /// All users, ordered by username.
    async fn list_users(&self) -> Result<Vec<User>, UserDetailsError>;
}

/// In-memory user store. Clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryUserDetailsService {
    users: Arc<RwLock<BTreeMap<String, User>>>,
}

impl InMemoryUserDetailsService {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDetailsService for InMemoryUserDetailsService {
    async fn load_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, UserDetailsError> {
        Ok(self.users.read().await.get(username).cloned())
    }
}

#[async_trait]
impl UserDetailsManager for InMemoryUserDetailsService {
    async fn create_user(&self, user: User) -> Result<(), UserDetailsError> {
        let mut users = self.users.write().await;
        if users.contains_key(user.get_username()) {
            return Err(UserDetailsError::AlreadyExists);
        }
        users.insert(user.get_username().to_string(), user);
        Ok(())
    }

    async fn delete_user(&self, username: &str) -> Result<(), UserDetailsError> {
        match self.users.write().await.remove(username) {
            Some(_) => Ok(()),
            None => Err(UserDetailsError::NotFound),
        }
    }

    async fn list_users(&self) -> Result<Vec<User>, UserDetailsError> {
        Ok(self.users.read().await.values().cloned().collect())
    }
}

/// Raw password hashed once to give unknown usernames the same cost as
/// wrong passwords.
const USER_NOT_FOUND_PASSWORD: &str = "userNotFoundPassword";

/// Verifies username/password pairs against a [`UserDetailsService`].
///
/// Password checks run on the blocking thread pool.
pub struct DaoAuthenticationProvider {
    service: Arc<dyn UserDetailsService>,
    encoder: Arc<dyn PasswordEncoder>,
    user_not_found_hash: Arc<OnceLock<Option<String>>>,
}

impl Clone for DaoAuthenticationProvider {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            encoder: Arc::clone(&self.encoder),
            user_not_found_hash: Arc::clone(&self.user_not_found_hash),
        }
    }
}

impl DaoAuthenticationProvider {
    pub fn new(service: Arc<dyn UserDetailsService>, encoder: Arc<dyn PasswordEncoder>) -> Self {
        Self {
            service,
            encoder,
            user_not_found_hash: Arc::new(OnceLock::new()),
        }
    }

    /// Returns the user with credentials erased on success.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, UserDetailsError> {
        let user = self.service.load_user_by_username(username).await?;

        let encoder = Arc::clone(&self.encoder);
        let not_found_hash = Arc::clone(&self.user_not_found_hash);
        let raw = password.to_string();
        let stored = user.as_ref().map(|u| u.get_password().to_string());
        let password_matches = web::block(move || match stored {
            Some(hash) => encoder.matches(&raw, &hash),
            None => {
                let dummy =
                    not_found_hash.get_or_init(|| encoder.encode(USER_NOT_FOUND_PASSWORD).ok());
                if let Some(dummy) = dummy {
                    encoder.matches(&raw, dummy);
                }
                false
            }
        })
        .await
        .map_err(|e| UserDetailsError::StorageError(e.to_string()))?;

        let user = match user {
            Some(user) if password_matches => user,
            _ => return Err(UserDetailsError::BadCredentials),
        };
        if !user.is_enabled() {
            return Err(UserDetailsError::AccountDisabled);
        }

        Ok(user.erase_credentials())
    }

    pub fn encoder(&self) -> &Arc<dyn PasswordEncoder> {
        &self.encoder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::security::crypto::{CryptoError, NoOpPasswordEncoder};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Plain-text encoder that counts its calls.
    #[derive(Default)]
    struct CountingEncoder {
        encodes: AtomicUsize,
        matches: AtomicUsize,
    }

    impl PasswordEncoder for CountingEncoder {
        fn encode(&self, raw_password: &str) -> Result<String, CryptoError> {
            self.encodes.fetch_add(1, Ordering::SeqCst);
            Ok(raw_password.to_string())
        }

        fn matches(&self, raw_password: &str, encoded_password: &str) -> bool {
            self.matches.fetch_add(1, Ordering::SeqCst);
            raw_password == encoded_password
        }
    }

    async fn provider_with(encoder: Arc<dyn PasswordEncoder>) -> DaoAuthenticationProvider {
        let service = InMemoryUserDetailsService::new();
        service.create_user(student()).await.unwrap();
        DaoAuthenticationProvider::new(Arc::new(service), encoder)
    }

    fn student() -> User {
        User::new("alice", "secret").roles(&["STUDENT"])
    }

    #[tokio::test]
    async fn test_in_memory_service() {
        let service = InMemoryUserDetailsService::new();
        service.create_user(student()).await.unwrap();

        let loaded = service.load_user_by_username("alice").await.unwrap();
        assert_eq!(loaded.map(|u| u.get_username().to_string()), Some("alice".to_string()));
        assert!(service.user_exists("alice").await.unwrap());
        assert!(!service.user_exists("unknown").await.unwrap());
    }

    #[tokio::test]
    async fn test_in_memory_manager() {
        let service = InMemoryUserDetailsService::new();
        service.create_user(student()).await.unwrap();

        let result = service.create_user(student()).await;
        assert_eq!(result, Err(UserDetailsError::AlreadyExists));

        service
            .create_user(User::new("bob", "x").roles(&["ADMIN"]))
            .await
            .unwrap();
        let names: Vec<String> = service
            .list_users()
            .await
            .unwrap()
            .iter()
            .map(|u| u.get_username().to_string())
            .collect();
        assert_eq!(names, vec!["alice".to_string(), "bob".to_string()]);

        service.delete_user("alice").await.unwrap();
        assert!(!service.user_exists("alice").await.unwrap());
        assert_eq!(service.delete_user("alice").await, Err(UserDetailsError::NotFound));
    }

    #[tokio::test]
    async fn test_provider_authenticates() {
        let provider = provider_with(Arc::new(NoOpPasswordEncoder)).await;

        let user = provider.authenticate("alice", "secret").await.unwrap();
        assert_eq!(user.get_username(), "alice");
        assert_eq!(user.get_password(), "");
        assert!(user.has_role("STUDENT"));
    }

    #[tokio::test]
    async fn test_provider_hides_unknown_user() {
        let provider = provider_with(Arc::new(NoOpPasswordEncoder)).await;

        assert_eq!(
            provider.authenticate("alice", "wrong").await,
            Err(UserDetailsError::BadCredentials)
        );
        assert_eq!(
            provider.authenticate("nobody", "secret").await,
            Err(UserDetailsError::BadCredentials)
        );
    }

    #[tokio::test]
    async fn test_provider_rejects_disabled() {
        let service = InMemoryUserDetailsService::new();
        service.create_user(student().enabled(false)).await.unwrap();
        let provider =
            DaoAuthenticationProvider::new(Arc::new(service), Arc::new(NoOpPasswordEncoder));

        assert_eq!(
            provider.authenticate("alice", "secret").await,
            Err(UserDetailsError::AccountDisabled)
        );
    }

    #[tokio::test]
    async fn test_unknown_user_still_checks_a_password() {
        let encoder = Arc::new(CountingEncoder::default());
        let provider = provider_with(encoder.clone()).await;

        for _ in 0..3 {
            assert_eq!(
                provider.authenticate("nobody", "secret").await,
                Err(UserDetailsError::BadCredentials)
            );
        }
        assert_eq!(encoder.matches.load(Ordering::SeqCst), 3);
        // The stand-in hash is computed once and shared by clones.
        provider.clone().authenticate("ghost", "x").await.unwrap_err();
        assert_eq!(encoder.encodes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_known_user_checks_password_once() {
        let encoder = Arc::new(CountingEncoder::default());
        let provider = provider_with(encoder.clone()).await;

        provider.authenticate("alice", "secret").await.unwrap();
        assert_eq!(encoder.matches.load(Ordering::SeqCst), 1);
        assert_eq!(encoder.encodes.load(Ordering::SeqCst), 0);
    }
}
