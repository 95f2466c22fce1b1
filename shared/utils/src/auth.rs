//! Login Gate
//!
//! Credential checking behind a trait, plus the in-memory session table used
//! by the web service.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, SystemTime};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::{SelectorError, SelectorResult};

/// Decides whether a username/password pair may log in.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// A single configured account. Only the argon2 hash of the password is kept.
pub struct StaticCredential {
    username: String,
    password_hash: String,
}

impl StaticCredential {
    /// Hash `password` once; call at process start.
    pub fn new(username: impl Into<String>, password: &str) -> SelectorResult<Self> {
        Ok(Self {
            username: username.into(),
            password_hash: hash_password(password)?,
        })
    }

    pub fn from_config(config: &AuthConfig) -> SelectorResult<Self> {
        Self::new(config.username.clone(), &config.password)
    }
}

impl CredentialVerifier for StaticCredential {
    fn verify(&self, username: &str, password: &str) -> bool {
        // hash check runs even for a wrong username
        let password_ok = verify_password(password, &self.password_hash).unwrap_or(false);
        username == self.username && password_ok
    }
}

pub fn hash_password(password: &str) -> SelectorResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| SelectorError::internal(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> SelectorResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| SelectorError::internal(format!("Invalid password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
    pub expires_at: SystemTime,
}

/// Logged-in sessions keyed by an opaque id.
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn create(&self, username: &str) -> String {
        let session_id = Uuid::new_v4().to_string();
        let session = Session {
            username: username.to_string(),
            expires_at: SystemTime::now() + self.ttl,
        };

        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.retain(|_, session| session.expires_at > SystemTime::now());
        sessions.insert(session_id.clone(), session);
        session_id
    }

    /// Username of a live session; expired sessions are dropped.
    pub fn validate(&self, session_id: &str) -> Option<String> {
        {
            let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
            match sessions.get(session_id) {
                Some(session) if session.expires_at > SystemTime::now() => {
                    return Some(session.username.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }

        self.remove(session_id);
        None
    }

    pub fn remove(&self, session_id: &str) {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.remove(session_id);
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
