//! Session token and identity snapshot.
//!
//! A session is an opaque random token mapped to a small identity snapshot
//! in the key-value store. The token is the only thing the web layer holds;
//! expiry is fixed at creation and never renewed on use.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed session lifetime from creation; not extended by activity.
pub const SESSION_TTL: Duration = Duration::from_secs(48 * 60 * 60);

/// Opaque session token handed to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken(Uuid);

impl SessionToken {
    /// Mint a fresh random token.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a token from its canonical string form.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw).ok().map(Self)
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identity snapshot stored against a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    /// Account identifier.
    pub user_id: Uuid,
    /// Username at sign-in time; display only, not re-validated.
    pub username: String,
}
