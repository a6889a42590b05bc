//! Port abstraction for note persistence adapters and their errors.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::user::UserId;

/// Persistence errors raised by note repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotePersistenceError {
    /// Repository connection could not be established.
    #[error("note repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("note repository query failed: {message}")]
    Query { message: String },
    /// The referenced note does not exist.
    #[error("note {note_id} not found")]
    NotFound { note_id: Uuid },
}

impl NotePersistenceError {
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

/// Note row as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredNote {
    pub id: Uuid,
    pub house_id: Uuid,
    pub maker_id: UserId,
    pub title: String,
    pub content: String,
}

#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a note under a house, returning its identifier.
    async fn create(
        &self,
        house_id: Uuid,
        maker: UserId,
        title: &str,
        content: &str,
    ) -> Result<Uuid, NotePersistenceError>;

    /// Update title and content only; the house association is immutable.
    async fn update(
        &self,
        note_id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<(), NotePersistenceError>;

    /// Delete the note row.
    async fn delete(&self, note_id: Uuid) -> Result<(), NotePersistenceError>;

    /// Whether `user` is the maker of `note_id`. An absent note is
    /// `Ok(false)`.
    async fn is_maker(&self, note_id: Uuid, user: UserId) -> Result<bool, NotePersistenceError>;
}

#[derive(Debug, Default)]
struct InMemoryNotes {
    rows: HashMap<Uuid, StoredNote>,
    fail: bool,
}

/// In-memory note repository for tests and local development.
#[derive(Debug, Default)]
pub struct InMemoryNoteRepository {
    state: Mutex<InMemoryNotes>,
}

impl InMemoryNoteRepository {
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

    /// Snapshot a stored note for assertions.
    pub fn stored(&self, note_id: Uuid) -> Option<StoredNote> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .rows
            .get(&note_id)
            .cloned()
    }
}

#[async_trait]
impl NoteRepository for InMemoryNoteRepository {
    async fn create(
        &self,
        house_id: Uuid,
        maker: UserId,
        title: &str,
        content: &str,
    ) -> Result<Uuid, NotePersistenceError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.fail {
            return Err(NotePersistenceError::query("injected failure"));
        }
        let id = Uuid::new_v4();
        state.rows.insert(
            id,
            StoredNote {
                id,
                house_id,
                maker_id: maker,
                title: title.to_owned(),
                content: content.to_owned(),
            },
        );
        Ok(id)
    }

    async fn update(
        &self,
        note_id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<(), NotePersistenceError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.fail {
            return Err(NotePersistenceError::query("injected failure"));
        }
        let note = state
            .rows
            .get_mut(&note_id)
            .ok_or(NotePersistenceError::NotFound { note_id })?;
        note.title = title.to_owned();
        note.content = content.to_owned();
        Ok(())
    }

    async fn delete(&self, note_id: Uuid) -> Result<(), NotePersistenceError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.fail {
            return Err(NotePersistenceError::query("injected failure"));
        }
        state.rows.remove(&note_id);
        Ok(())
    }

    async fn is_maker(&self, note_id: Uuid, user: UserId) -> Result<bool, NotePersistenceError> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.fail {
            return Err(NotePersistenceError::query("injected failure"));
        }
        Ok(state
            .rows
            .get(&note_id)
            .is_some_and(|note| note.maker_id == user))
    }
}
