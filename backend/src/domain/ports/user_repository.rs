//! Port abstraction for user persistence adapters and their errors.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::user::{NewUser, StoredCredentials, UserId, UserMatch};

/// Persistence errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserPersistenceError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query { message: String },
    /// The email or username is already taken.
    #[error("an account with this email or username already exists")]
    DuplicateIdentity,
}

impl UserPersistenceError {
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

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account, returning its identifier.
    ///
    /// A unique-constraint violation on email or username maps to
    /// [`UserPersistenceError::DuplicateIdentity`].
    async fn insert(&self, user: &NewUser) -> Result<UserId, UserPersistenceError>;

    /// Load the credential row for an email, if any account matches.
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;

    /// Usernames starting with `prefix`, excluding the given usernames.
    ///
    /// Drives the roommate-search suggestion box; the exclusion list holds
    /// usernames already added to the form.
    async fn search_usernames(
        &self,
        prefix: &str,
        exclude: &[String],
    ) -> Result<Vec<UserMatch>, UserPersistenceError>;
}

#[derive(Debug, Default)]
struct InMemoryUsers {
    rows: Vec<(UserId, NewUser)>,
    fail: bool,
}

/// In-memory user repository for tests and local development.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    state: Mutex<InMemoryUsers>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with a query error.
    pub fn fail_operations(&self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .fail = true;
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<UserId, UserPersistenceError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.fail {
            return Err(UserPersistenceError::query("injected failure"));
        }
        let taken = state
            .rows
            .iter()
            .any(|(_, row)| row.email == user.email || row.username == user.username);
        if taken {
            return Err(UserPersistenceError::DuplicateIdentity);
        }
        let id = UserId::random();
        state.rows.push((id, user.clone()));
        Ok(id)
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.fail {
            return Err(UserPersistenceError::query("injected failure"));
        }
        Ok(state
            .rows
            .iter()
            .find(|(_, row)| row.email == email)
            .map(|(id, row)| StoredCredentials {
                id: *id,
                username: row.username.clone(),
                password_hash: row.password_hash.clone(),
            }))
    }

    async fn search_usernames(
        &self,
        prefix: &str,
        exclude: &[String],
    ) -> Result<Vec<UserMatch>, UserPersistenceError> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.fail {
            return Err(UserPersistenceError::query("injected failure"));
        }
        Ok(state
            .rows
            .iter()
            .filter(|(_, row)| {
                row.username.starts_with(prefix) && !exclude.contains(&row.username)
            })
            .map(|(id, row)| UserMatch {
                id: *id,
                username: row.username.clone(),
            })
            .collect())
    }
}
