//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend on
//! domain services and ports only, staying testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{HouseRepository, NoteRepository, SessionStore, UserRepository};
use crate::domain::{AccountService, HouseService, NoteService};

/// Parameter object bundling the port implementations behind the handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub sessions: Arc<dyn SessionStore>,
    pub users: Arc<dyn UserRepository>,
    pub houses: Arc<dyn HouseRepository>,
    pub notes: Arc<dyn NoteRepository>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub sessions: Arc<dyn SessionStore>,
    pub accounts: AccountService,
    pub houses: HouseService,
    pub notes: NoteService,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self {
            sessions: Arc::clone(&ports.sessions),
            accounts: AccountService::new(Arc::clone(&ports.users)),
            houses: HouseService::new(Arc::clone(&ports.houses)),
            notes: NoteService::new(Arc::clone(&ports.notes), Arc::clone(&ports.houses)),
        }
    }
}
