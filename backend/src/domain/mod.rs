//! Core domain: entities, form validation, use-case services, and ports.
//!
//! Nothing in this module imports actix-web, Diesel, or Redis types; the
//! inbound and outbound layers adapt to and from the types defined here.

pub mod accounts;
pub mod auth;
pub mod error;
pub mod forms;
pub mod houses;
pub mod messages;
pub mod notes;
pub mod ports;
pub mod session;
pub mod user;

pub use accounts::AccountService;
pub use auth::{Credentials, CredentialsError};
pub use error::{Error, ErrorCode};
pub use houses::HouseService;
pub use messages::{Message, MessageKey};
pub use notes::NoteService;
pub use session::{SessionIdentity, SessionToken, SESSION_TTL};
pub use user::{NewUser, StoredCredentials, UserId, UserMatch};
