//! Learner Authentication Module
//!
//! Account handling for the tutoring platform:
//! - Registration with salted password hashes
//! - Email/password login issuing bearer session tokens
//! - Token lookup and logout, with sessions expiring after a fixed TTL

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storage::{LearnerRecord, Repository, StorageError};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

/// Default session lifetime
pub const DEFAULT_SESSION_TTL_SECS: u64 = 24 * 60 * 60;

/// Session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seconds a login token stays valid
    pub ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_SESSION_TTL_SECS,
        }
    }
}

/// Authentication error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Email is already registered")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid or expired session token")]
    InvalidToken,

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<StorageError> for AuthError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict(_) => AuthError::EmailTaken,
            other => AuthError::Storage(other.to_string()),
        }
    }
}

/// Public view of a learner account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Learner {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&LearnerRecord> for Learner {
    fn from(record: &LearnerRecord) -> Self {
        Self {
            id: record.id,
            username: record.username.clone(),
            email: record.email.clone(),
            created_at: record.created_at,
        }
    }
}

/// Issued login session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub learner: Learner,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Authentication service
pub struct AuthService {
    /// Account store
    repository: Arc<Repository>,

    /// Active sessions by token
    sessions: Mutex<HashMap<String, Session>>,

    /// Session lifetime
    session_ttl: Duration,
}

impl AuthService {
    /// Create new auth service with the default session lifetime
    pub fn new(repository: Arc<Repository>) -> Self {
        Self::with_config(repository, &SessionConfig::default())
    }

    /// Create new auth service with explicit session settings
    pub fn with_config(repository: Arc<Repository>, config: &SessionConfig) -> Self {
        Self {
            repository,
            sessions: Mutex::new(HashMap::new()),
            session_ttl: Duration::from_secs(config.ttl_secs),
        }
    }

    /// Register a new learner
    pub fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Learner, AuthError> {
        let username = username.trim();
        let email = email.trim();

        if username.is_empty() {
            return Err(AuthError::InvalidInput("username is required".to_string()));
        }
        if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(AuthError::InvalidInput("a valid email is required".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::InvalidInput(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let salt = Uuid::new_v4().simple().to_string();
        let record = LearnerRecord {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: hash_password(&salt, password),
            salt,
            created_at: Utc::now(),
        };

        self.repository.insert_learner(record.clone())?;
        info!("Registered learner {}", record.id);

        Ok(Learner::from(&record))
    }

    /// Log in with email and password
    pub fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let record = self
            .repository
            .find_learner_by_email(email.trim())?
            .ok_or(AuthError::InvalidCredentials)?;

        if hash_password(&record.salt, password) != record.password_hash {
            warn!("Failed login attempt for learner {}", record.id);
            return Err(AuthError::InvalidCredentials);
        }

        let issued_at = Utc::now();
        let session = Session {
            token: Uuid::new_v4().simple().to_string(),
            learner: Learner::from(&record),
            issued_at,
            expires_at: expiry(issued_at, self.session_ttl),
        };

        let mut sessions = self
            .sessions
            .lock()
            .map_err(|e| AuthError::Storage(format!("Lock error: {}", e)))?;

        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(issued_at));
        if sessions.len() < before {
            debug!("Pruned {} expired sessions", before - sessions.len());
        }
        sessions.insert(session.token.clone(), session.clone());

        info!("Learner {} logged in", record.id);
        Ok(session)
    }

    /// Resolve a bearer token to its learner
    pub fn authenticate(&self, token: &str) -> Result<Learner, AuthError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|e| AuthError::Storage(format!("Lock error: {}", e)))?;

        let session = sessions.get(token).ok_or(AuthError::InvalidToken)?;
        if session.is_expired(Utc::now()) {
            debug!("Session for learner {} expired", session.learner.id);
            sessions.remove(token);
            return Err(AuthError::InvalidToken);
        }

        Ok(session.learner.clone())
    }

    /// End a session. Returns whether the token was active.
    pub fn logout(&self, token: &str) -> bool {
        let removed = self
            .sessions
            .lock()
            .map(|mut s| s.remove(token).is_some())
            .unwrap_or(false);
        if removed {
            debug!("Session ended");
        }
        removed
    }

    /// Number of unexpired sessions
    pub fn active_sessions(&self) -> usize {
        let now = Utc::now();
        self.sessions
            .lock()
            .map(|s| s.values().filter(|s| !s.is_expired(now)).count())
            .unwrap_or(0)
    }
}

/// End of a session's lifetime, saturating on overflow
fn expiry(issued_at: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| issued_at.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Salted SHA-256 password hash, hex encoded
fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn service() -> AuthService {
        AuthService::new(Arc::new(Repository::new()))
    }

    fn expiring_service() -> AuthService {
        AuthService::with_config(Arc::new(Repository::new()), &SessionConfig { ttl_secs: 0 })
    }

    #[test]
    fn test_register_and_login() {
        let auth = service();
        let learner = auth.register("sam", "sam@example.com", "secret123").unwrap();
        assert_eq!(learner.username, "sam");

        let session = auth.login("sam@example.com", "secret123").unwrap();
        assert_eq!(session.learner.id, learner.id);
        assert_eq!(auth.authenticate(&session.token).unwrap().id, learner.id);
    }

    #[test]
    fn test_password_not_stored_in_plain_text() {
        let repository = Arc::new(Repository::new());
        let auth = AuthService::new(repository.clone());
        auth.register("sam", "sam@example.com", "secret123").unwrap();

        let record = repository.find_learner_by_email("sam@example.com").unwrap().unwrap();
        assert_ne!(record.password_hash, "secret123");
        assert_eq!(record.password_hash.len(), 64);
    }

    #[test]
    fn test_invalid_registration() {
        let auth = service();
        assert!(matches!(
            auth.register("", "sam@example.com", "secret123"),
            Err(AuthError::InvalidInput(_))
        ));
        assert!(matches!(
            auth.register("sam", "not-an-email", "secret123"),
            Err(AuthError::InvalidInput(_))
        ));
        assert!(matches!(
            auth.register("sam", "sam@example.com", "123"),
            Err(AuthError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_email_taken() {
        let auth = service();
        auth.register("sam", "sam@example.com", "secret123").unwrap();
        assert_eq!(
            auth.register("other", "SAM@example.com", "secret456"),
            Err(AuthError::EmailTaken)
        );
    }

    #[test]
    fn test_wrong_password() {
        let auth = service();
        auth.register("sam", "sam@example.com", "secret123").unwrap();

        assert_eq!(
            auth.login("sam@example.com", "wrong-pass").unwrap_err(),
            AuthError::InvalidCredentials
        );
        assert_eq!(
            auth.login("nobody@example.com", "secret123").unwrap_err(),
            AuthError::InvalidCredentials
        );
    }

    #[test]
    fn test_logout() {
        let auth = service();
        auth.register("sam", "sam@example.com", "secret123").unwrap();
        let session = auth.login("sam@example.com", "secret123").unwrap();
        assert_eq!(auth.active_sessions(), 1);

        assert!(auth.logout(&session.token));
        assert!(!auth.logout(&session.token));
        assert_eq!(auth.authenticate(&session.token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_session_expires_after_ttl() {
        let auth = expiring_service();
        auth.register("sam", "sam@example.com", "secret123").unwrap();
        let session = auth.login("sam@example.com", "secret123").unwrap();
        assert_eq!(session.expires_at, session.issued_at);

        assert_eq!(auth.authenticate(&session.token), Err(AuthError::InvalidToken));
        assert_eq!(auth.active_sessions(), 0);
        assert!(!auth.logout(&session.token));
    }

    #[test]
    fn test_login_prunes_expired_sessions() {
        let auth = expiring_service();
        auth.register("sam", "sam@example.com", "secret123").unwrap();

        let first = auth.login("sam@example.com", "secret123").unwrap();
        let second = auth.login("sam@example.com", "secret123").unwrap();

        let sessions = auth.sessions.lock().unwrap();
        assert_eq!(sessions.len(), 1);
        assert!(!sessions.contains_key(&first.token));
        assert!(sessions.contains_key(&second.token));
    }

    #[test]
    fn test_default_ttl_keeps_session_alive() {
        let auth = service();
        auth.register("sam", "sam@example.com", "secret123").unwrap();
        let session = auth.login("sam@example.com", "secret123").unwrap();

        assert_eq!(
            (session.expires_at - session.issued_at).num_seconds(),
            DEFAULT_SESSION_TTL_SECS as i64
        );
        assert!(auth.authenticate(&session.token).is_ok());
    }

    #[test]
    fn test_expiry_saturates() {
        let now = Utc::now();
        assert_eq!(expiry(now, Duration::from_secs(u64::MAX)), DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(hash_password("a", "pw"), hash_password("b", "pw"));
    }

    proptest! {
        #[test]
        fn prop_distinct_passwords_hash_apart(
            salt in "[a-f0-9]{32}",
            first in ".{6,40}",
            second in ".{6,40}",
        ) {
            prop_assume!(first != second);
            let a = hash_password(&salt, &first);
            let b = hash_password(&salt, &second);

            prop_assert_ne!(&a, &b);
            prop_assert_eq!(a.len(), 64);
            prop_assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }
}
