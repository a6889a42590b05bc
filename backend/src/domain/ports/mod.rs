//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (the relational store and the key-value session store). Each trait
//! exposes strongly typed errors so adapters map their failures into
//! predictable variants.
//!
//! Each port file also carries an in-memory implementation. These are real
//! program types, not test-only scaffolding: handler and service tests wire
//! them through the same state struct production uses.

mod house_repository;
mod note_repository;
mod session_store;
mod user_repository;

pub use house_repository::{
    HousePersistenceError, HouseRepository, InMemoryHouseRepository, StoredHouse,
};
pub use note_repository::{
    InMemoryNoteRepository, NotePersistenceError, NoteRepository, StoredNote,
};
pub use session_store::{InMemorySessionStore, SessionStore, SessionStoreError};
pub use user_repository::{InMemoryUserRepository, UserPersistenceError, UserRepository};
