//! Note aggregate service: lifecycle mutations gated on the maker identity.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::ports::{HouseRepository, NoteRepository};
use crate::domain::user::UserId;
use crate::domain::Error;

/// Use-case service for note aggregates.
///
/// Creation requires a resolvable house; update and delete are gated on the
/// note's maker identity, failing closed like the house service.
#[derive(Clone)]
pub struct NoteService {
    notes: Arc<dyn NoteRepository>,
    houses: Arc<dyn HouseRepository>,
}

impl NoteService {
    pub fn new(notes: Arc<dyn NoteRepository>, houses: Arc<dyn HouseRepository>) -> Self {
        Self { notes, houses }
    }

    /// Create a note under an existing house, made by `acting`.
    pub async fn create(
        &self,
        acting: UserId,
        house_id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<Uuid, Error> {
        let house_exists = self.houses.exists(house_id).await.map_err(|err| {
            tracing::error!(error = %err, %house_id, "house lookup failed");
            Error::internal("could not save note")
        })?;
        if !house_exists {
            return Err(Error::not_found("house not found"));
        }

        self.notes
            .create(house_id, acting, title, content)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, %house_id, "note creation failed");
                Error::internal("could not save note")
            })
    }

    /// Update title and content; the house association never changes.
    pub async fn update(
        &self,
        acting: UserId,
        note_id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<(), Error> {
        self.ensure_maker(note_id, acting).await?;
        self.notes
            .update(note_id, title, content)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, %note_id, "note update failed");
                Error::internal("could not save note")
            })
    }

    /// Delete the note.
    pub async fn delete(&self, acting: UserId, note_id: Uuid) -> Result<(), Error> {
        self.ensure_maker(note_id, acting).await?;
        self.notes.delete(note_id).await.map_err(|err| {
            tracing::error!(error = %err, %note_id, "note delete failed");
            Error::internal("could not delete note")
        })
    }

    /// Authorization gate mirroring the house service: store failures log
    /// server-side and read as "not maker".
    async fn ensure_maker(&self, note_id: Uuid, user: UserId) -> Result<(), Error> {
        let is_maker = match self.notes.is_maker(note_id, user).await {
            Ok(is_maker) => is_maker,
            Err(err) => {
                tracing::error!(error = %err, %note_id, "maker check failed");
                false
            }
        };
        if is_maker {
            Ok(())
        } else {
            Err(Error::forbidden("not allowed to modify"))
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{InMemoryHouseRepository, InMemoryNoteRepository};
    use crate::domain::ErrorCode;

    struct Fixture {
        houses: Arc<InMemoryHouseRepository>,
        notes: Arc<InMemoryNoteRepository>,
        service: NoteService,
    }

    fn fixture() -> Fixture {
        let houses = Arc::new(InMemoryHouseRepository::new());
        let notes = Arc::new(InMemoryNoteRepository::new());
        let service = NoteService::new(
            Arc::clone(&notes) as Arc<dyn NoteRepository>,
            Arc::clone(&houses) as Arc<dyn HouseRepository>,
        );
        Fixture {
            houses,
            notes,
            service,
        }
    }

    async fn seeded_house(fixture: &Fixture, maker: UserId) -> Uuid {
        fixture
            .houses
            .create("Sea House", maker, &[*maker.as_uuid()])
            .await
            .expect("seed house")
    }

    #[tokio::test]
    async fn creating_under_a_missing_house_is_not_found() {
        let fixture = fixture();
        let err = fixture
            .service
            .create(UserId::random(), Uuid::new_v4(), "Groceries", "milk")
            .await
            .expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn maker_can_update_title_and_content_only() {
        let fixture = fixture();
        let maker = UserId::random();
        let house = seeded_house(&fixture, maker).await;
        let note = fixture
            .service
            .create(maker, house, "Groceries", "milk")
            .await
            .expect("create");

        fixture
            .service
            .update(maker, note, "Groceries v2", "milk and eggs")
            .await
            .expect("update");

        let stored = fixture.notes.stored(note).expect("note present");
        assert_eq!(stored.title, "Groceries v2");
        assert_eq!(stored.house_id, house);
    }

    #[tokio::test]
    async fn non_maker_update_and_delete_fail_closed() {
        let fixture = fixture();
        let maker = UserId::random();
        let stranger = UserId::random();
        let house = seeded_house(&fixture, maker).await;
        let note = fixture
            .service
            .create(maker, house, "Groceries", "milk")
            .await
            .expect("create");

        let err = fixture
            .service
            .update(stranger, note, "Hijacked", "nope")
            .await
            .expect_err("must be forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);

        let err = fixture
            .service
            .delete(stranger, note)
            .await
            .expect_err("must be forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(
            fixture.notes.stored(note).expect("note present").title,
            "Groceries"
        );
    }

    #[tokio::test]
    async fn store_failure_during_maker_check_reads_as_forbidden() {
        let fixture = fixture();
        let maker = UserId::random();
        let house = seeded_house(&fixture, maker).await;
        let note = fixture
            .service
            .create(maker, house, "Groceries", "milk")
            .await
            .expect("create");

        fixture.notes.fail_operations();
        let err = fixture
            .service
            .delete(maker, note)
            .await
            .expect_err("must be forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
