//! Explicit session store.
//!
//! Sessions are opaque random tokens handed out at login and carried in a
//! cookie. Every request resolves its token against the injected store; no
//! session state lives in process-global middleware.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::domain::AuthUser;

pub mod seaorm;

const TOKEN_LEN: usize = 48;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("repository error: {0}")]
    Repository(String),
}

/// Identity attached to a request once its session token resolves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

/// A freshly issued session, ready to be written into a cookie.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Server-side session persistence. One implementation per backing store;
/// handlers only ever see this trait.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Issue a new token for the given account.
    async fn create(&self, user: &AuthUser, ttl: Duration) -> Result<IssuedSession, SessionError>;

    /// Resolve a token to the current identity. Unknown and expired tokens
    /// both resolve to `None`; expired rows are removed on the way out.
    async fn resolve(&self, token: &str) -> Result<Option<CurrentUser>, SessionError>;

    /// Drop a session. Returns whether a live session was removed.
    async fn revoke(&self, token: &str) -> Result<bool, SessionError>;
}

/// Cryptographically random alphanumeric token.
pub fn generate_token() -> String {
    OsRng.sample_iter(&Alphanumeric).take(TOKEN_LEN).map(char::from).collect()
}

/// In-memory store for tests and doc examples; identity is snapshotted at
/// create time.
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct Entry {
        user: CurrentUser,
        expires_at: DateTime<Utc>,
    }

    #[derive(Default)]
    pub struct MemorySessionStore {
        sessions: Mutex<HashMap<String, Entry>>,
    }

    #[async_trait]
    impl SessionStore for MemorySessionStore {
        async fn create(&self, user: &AuthUser, ttl: Duration) -> Result<IssuedSession, SessionError> {
            let token = generate_token();
            let expires_at = Utc::now() + ttl;
            let entry = Entry {
                user: CurrentUser { id: user.id, email: user.email.clone(), name: user.name.clone() },
                expires_at,
            };
            self.sessions.lock().unwrap().insert(token.clone(), entry);
            Ok(IssuedSession { token, expires_at })
        }

        async fn resolve(&self, token: &str) -> Result<Option<CurrentUser>, SessionError> {
            let mut sessions = self.sessions.lock().unwrap();
            match sessions.get(token) {
                Some(entry) if entry.expires_at > Utc::now() => Ok(Some(entry.user.clone())),
                Some(_) => {
                    sessions.remove(token);
                    Ok(None)
                }
                None => Ok(None),
            }
        }

        async fn revoke(&self, token: &str) -> Result<bool, SessionError> {
            Ok(self.sessions.lock().unwrap().remove(token).is_some())
        }
    }
}
