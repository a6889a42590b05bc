//! Port abstraction for the session store and its errors.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::session::{SessionIdentity, SessionToken};

/// Errors raised by session store adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionStoreError {
    /// Store connection could not be established.
    #[error("session store connection failed: {message}")]
    Connection { message: String },
    /// Read or write failed during execution.
    #[error("session store query failed: {message}")]
    Query { message: String },
    /// A freshly minted token already existed in the store.
    ///
    /// Tokens are random UUIDs, so a collision indicates either a broken
    /// random source or store corruption; callers fail fast.
    #[error("session token collision")]
    TokenCollision,
}

impl SessionStoreError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Key-value session storage with fixed-TTL entries.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Mint a fresh token and store the identity under it.
    ///
    /// The write is set-if-absent; an existing key is a
    /// [`SessionStoreError::TokenCollision`].
    async fn create(&self, identity: &SessionIdentity)
        -> Result<SessionToken, SessionStoreError>;

    /// Look up the identity for a token.
    ///
    /// An unknown or expired token is `Ok(None)`, not an error.
    async fn get(&self, token: &SessionToken) -> Result<Option<SessionIdentity>, SessionStoreError>;

    /// Remove a session. Deleting an absent token is not an error.
    async fn delete(&self, token: &SessionToken) -> Result<(), SessionStoreError>;
}

/// In-memory session store for tests and local development.
///
/// Entries never expire; TTL behaviour belongs to the real store.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<Uuid, SessionIdentity>>,
    fail: Mutex<bool>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with a query error.
    pub fn fail_operations(&self) {
        *self.fail.lock().unwrap_or_else(PoisonError::into_inner) = true;
    }

    fn check_failure(&self) -> Result<(), SessionStoreError> {
        if *self.fail.lock().unwrap_or_else(PoisonError::into_inner) {
            Err(SessionStoreError::query("injected failure"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(
        &self,
        identity: &SessionIdentity,
    ) -> Result<SessionToken, SessionStoreError> {
        self.check_failure()?;
        let token = SessionToken::random();
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        if sessions.contains_key(token.as_uuid()) {
            return Err(SessionStoreError::TokenCollision);
        }
        sessions.insert(*token.as_uuid(), identity.clone());
        Ok(token)
    }

    async fn get(
        &self,
        token: &SessionToken,
    ) -> Result<Option<SessionIdentity>, SessionStoreError> {
        self.check_failure()?;
        Ok(self
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token.as_uuid())
            .cloned())
    }

    async fn delete(&self, token: &SessionToken) -> Result<(), SessionStoreError> {
        self.check_failure()?;
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token.as_uuid());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    fn identity() -> SessionIdentity {
        SessionIdentity {
            user_id: Uuid::new_v4(),
            username: "ryan".into(),
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let store = InMemorySessionStore::new();
        let who = identity();
        let token = store.create(&who).await.expect("create session");
        assert_eq!(store.get(&token).await.expect("get"), Some(who));
    }

    #[tokio::test]
    async fn unknown_and_deleted_tokens_are_no_session_not_errors() {
        let store = InMemorySessionStore::new();
        let never = SessionToken::random();
        assert_eq!(store.get(&never).await.expect("get"), None);

        let token = store.create(&identity()).await.expect("create");
        store.delete(&token).await.expect("delete");
        assert_eq!(store.get(&token).await.expect("get"), None);
        // Deleting again is still fine.
        store.delete(&token).await.expect("second delete");
    }

    #[tokio::test]
    async fn injected_failures_surface_as_query_errors() {
        let store = InMemorySessionStore::new();
        store.fail_operations();
        let err = store.create(&identity()).await.expect_err("must fail");
        assert!(matches!(err, SessionStoreError::Query { .. }));
    }
}
