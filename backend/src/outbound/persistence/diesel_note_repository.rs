//! PostgreSQL-backed `NoteRepository` implementation using Diesel.

use async_trait::async_trait;
use chrono::Utc;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{NotePersistenceError, NoteRepository};
use crate::domain::user::UserId;

use super::models::NewNoteRow;
use super::pool::{DbPool, PoolError};
use super::schema::notes;

/// Diesel-backed implementation of the `NoteRepository` port.
#[derive(Clone)]
pub struct DieselNoteRepository {
    pool: DbPool,
}

impl DieselNoteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> NotePersistenceError {
    NotePersistenceError::connection(error.to_string())
}

fn map_diesel_error(error: diesel::result::Error) -> NotePersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            NotePersistenceError::connection("database connection error")
        }
        _ => NotePersistenceError::query("database error"),
    }
}

#[async_trait]
impl NoteRepository for DieselNoteRepository {
    async fn create(
        &self,
        house_id: Uuid,
        maker: UserId,
        title: &str,
        content: &str,
    ) -> Result<Uuid, NotePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = Uuid::new_v4();
        let row = NewNoteRow {
            id,
            house_id,
            maker_id: *maker.as_uuid(),
            title,
            content,
        };
        diesel::insert_into(notes::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(id)
    }

    async fn update(
        &self,
        note_id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<(), NotePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(notes::table.find(note_id))
            .set((
                notes::title.eq(title),
                notes::content.eq(content),
                notes::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(NotePersistenceError::NotFound { note_id });
        }
        Ok(())
    }

    async fn delete(&self, note_id: Uuid) -> Result<(), NotePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(notes::table.find(note_id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn is_maker(&self, note_id: Uuid, user: UserId) -> Result<bool, NotePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(exists(
            notes::table
                .find(note_id)
                .filter(notes::maker_id.eq(user.as_uuid())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }
}
