//! Account use-cases: registration and credential sign-in.

use std::sync::Arc;

use crate::domain::auth::{hash_password, verify_password, Credentials};
use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::session::SessionIdentity;
use crate::domain::user::{NewUser, UserMatch};
use crate::domain::Error;

/// Use-case service for account registration and sign-in.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Register a new account and return the identity to start a session
    /// with.
    ///
    /// A taken email or username surfaces as a conflict; the caller renders
    /// it as a form-level message rather than revealing which field
    /// collided.
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<SessionIdentity, Error> {
        let password_hash = hash_password(password).map_err(|err| {
            tracing::error!(error = %err, "password hashing failed");
            Error::internal("unable to register this account")
        })?;

        let user = NewUser {
            email: email.to_owned(),
            username: username.to_owned(),
            password_hash,
        };

        match self.users.insert(&user).await {
            Ok(id) => Ok(SessionIdentity {
                user_id: *id.as_uuid(),
                username: user.username,
            }),
            Err(UserPersistenceError::DuplicateIdentity) => {
                Err(Error::conflict("account already exists"))
            }
            Err(err) => {
                tracing::error!(error = %err, "account insertion failed");
                Err(Error::internal("unable to register this account"))
            }
        }
    }

    /// Verify credentials and return the identity to start a session with.
    ///
    /// Unknown email and wrong password are indistinguishable to the
    /// caller.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<SessionIdentity, Error> {
        let invalid = || Error::unauthorized("invalid credentials");

        let stored = self
            .users
            .find_credentials_by_email(credentials.email())
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "credential lookup failed");
                Error::internal("unable to sign in")
            })?;

        let Some(stored) = stored else {
            return Err(invalid());
        };

        match verify_password(credentials.password(), &stored.password_hash) {
            Ok(true) => Ok(SessionIdentity {
                user_id: *stored.id.as_uuid(),
                username: stored.username,
            }),
            Ok(false) => Err(invalid()),
            Err(err) => {
                // An unreadable stored hash is a data problem; to the user
                // it is still just a failed sign-in.
                tracing::error!(error = %err, "stored password hash unreadable");
                Err(invalid())
            }
        }
    }

    /// Usernames matching a prefix, excluding those already listed.
    pub async fn search_usernames(
        &self,
        prefix: &str,
        exclude: &[String],
    ) -> Result<Vec<UserMatch>, Error> {
        self.users
            .search_usernames(prefix, exclude)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "username search failed");
                Error::internal("unable to search users")
            })
    }
}
