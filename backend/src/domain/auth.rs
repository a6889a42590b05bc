//! Authentication primitives: validated credentials and password hashing.
//!
//! Plaintext passwords live in [`zeroize::Zeroizing`] wrappers and never
//! cross a port; storage only ever sees PHC-format Argon2id hashes.

use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use zeroize::Zeroizing;

/// Domain error returned when sign-in payload values are unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsError {}

/// Validated sign-in credentials.
///
/// ## Invariants
/// - `email` is trimmed and non-empty.
/// - `password` is non-empty and retains caller-provided whitespace so
///   comparisons never surprise the user.
#[derive(Debug, Clone)]
pub struct Credentials {
    email: String,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(CredentialsError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(CredentialsError::EmptyPassword);
        }
        Ok(Self {
            email: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email string used for the account lookup.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Plaintext password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Failures from hashing or verifying a password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// Hashing a new password failed.
    #[error("password hashing failed: {message}")]
    Hash { message: String },
    /// A stored hash could not be parsed as a PHC string.
    #[error("stored password hash is malformed")]
    MalformedStoredHash,
}

/// Hash a plaintext password into a PHC-format Argon2id string.
pub fn hash_password(plaintext: &str) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| PasswordHashError::Hash {
            message: err.to_string(),
        })
}

/// Verify a plaintext password against a stored PHC hash.
///
/// A mismatch is `Ok(false)`; only an unparseable stored hash is an error.
pub fn verify_password(plaintext: &str, stored_hash: &str) -> Result<bool, PasswordHashError> {
    let parsed =
        PasswordHash::new(stored_hash).map_err(|_| PasswordHashError::MalformedStoredHash)?;
    Ok(Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok())
}
