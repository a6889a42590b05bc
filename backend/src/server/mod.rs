//! Server wiring: adapters are constructed here and handed to the HTTP
//! layer as a [`HttpState`].

pub mod config;

use std::sync::Arc;

use crate::inbound::http::{HttpState, HttpStatePorts};
use crate::outbound::persistence::{
    DbPool, DieselHouseRepository, DieselNoteRepository, DieselUserRepository,
};
use crate::outbound::session_store::RedisSessionStore;

pub use config::{AppConfig, MissingEnv};

/// Wire the production adapters over the given pools.
pub fn build_state(db: DbPool, sessions: RedisSessionStore) -> HttpState {
    HttpState::from(HttpStatePorts {
        sessions: Arc::new(sessions),
        users: Arc::new(DieselUserRepository::new(db.clone())),
        houses: Arc::new(DieselHouseRepository::new(db.clone())),
        notes: Arc::new(DieselNoteRepository::new(db)),
    })
}
