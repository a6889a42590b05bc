//! Port abstraction for house persistence adapters and their errors.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::user::UserId;

/// Persistence errors raised by house repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HousePersistenceError {
    /// Repository connection could not be established.
    #[error("house repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("house repository query failed: {message}")]
    Query { message: String },
    /// The referenced house does not exist.
    #[error("house {house_id} not found")]
    NotFound { house_id: Uuid },
}

impl HousePersistenceError {
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

/// House row plus its membership set, as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredHouse {
    pub id: Uuid,
    pub name: String,
    pub maker_id: UserId,
    /// Member user ids, maker included.
    pub members: Vec<Uuid>,
}

#[async_trait]
pub trait HouseRepository: Send + Sync {
    /// Insert a house row and its membership rows in one transaction.
    ///
    /// `members` already includes the maker; the adapter does not add it.
    async fn create(
        &self,
        name: &str,
        maker: UserId,
        members: &[Uuid],
    ) -> Result<Uuid, HousePersistenceError>;

    /// Update the name and replace the full membership set in one
    /// transaction: delete every existing membership row, reinsert
    /// `members`.
    async fn replace(
        &self,
        house_id: Uuid,
        name: &str,
        members: &[Uuid],
    ) -> Result<(), HousePersistenceError>;

    /// Delete the house row; membership rows cascade at the storage layer.
    async fn delete(&self, house_id: Uuid) -> Result<(), HousePersistenceError>;

    /// Whether `user` is the maker of `house_id`. An absent house is
    /// `Ok(false)`.
    async fn is_maker(&self, house_id: Uuid, user: UserId)
        -> Result<bool, HousePersistenceError>;

    /// Whether the house row exists.
    async fn exists(&self, house_id: Uuid) -> Result<bool, HousePersistenceError>;
}

#[derive(Debug, Default)]
struct InMemoryHouses {
    rows: HashMap<Uuid, StoredHouse>,
    fail: bool,
    member_insert_budget: Option<usize>,
}

/// In-memory house repository for tests and local development.
///
/// Aggregate writes stage their membership rows before committing, so an
/// injected mid-aggregate failure leaves no partial state, matching the
/// transactional adapter.
#[derive(Debug, Default)]
pub struct InMemoryHouseRepository {
    state: Mutex<InMemoryHouses>,
}

impl InMemoryHouseRepository {
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

    /// Fail each aggregate write once it has inserted `allowed` membership
    /// rows, mimicking a write failure partway through the aggregate.
    pub fn fail_member_inserts_after(&self, allowed: usize) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .member_insert_budget = Some(allowed);
    }

    /// Snapshot a stored house for assertions.
    pub fn stored(&self, house_id: Uuid) -> Option<StoredHouse> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .rows
            .get(&house_id)
            .cloned()
    }

    /// Number of house rows currently stored.
    pub fn house_count(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .rows
            .len()
    }
}

fn stage_members(
    budget: Option<usize>,
    members: &[Uuid],
) -> Result<Vec<Uuid>, HousePersistenceError> {
    let mut staged = Vec::with_capacity(members.len());
    for member in members {
        if budget.is_some_and(|allowed| staged.len() >= allowed) {
            return Err(HousePersistenceError::query("injected failure"));
        }
        staged.push(*member);
    }
    Ok(staged)
}

#[async_trait]
impl HouseRepository for InMemoryHouseRepository {
    async fn create(
        &self,
        name: &str,
        maker: UserId,
        members: &[Uuid],
    ) -> Result<Uuid, HousePersistenceError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.fail {
            return Err(HousePersistenceError::query("injected failure"));
        }
        let staged = stage_members(state.member_insert_budget, members)?;
        let id = Uuid::new_v4();
        state.rows.insert(
            id,
            StoredHouse {
                id,
                name: name.to_owned(),
                maker_id: maker,
                members: staged,
            },
        );
        Ok(id)
    }

    async fn replace(
        &self,
        house_id: Uuid,
        name: &str,
        members: &[Uuid],
    ) -> Result<(), HousePersistenceError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.fail {
            return Err(HousePersistenceError::query("injected failure"));
        }
        let budget = state.member_insert_budget;
        let house = state
            .rows
            .get_mut(&house_id)
            .ok_or(HousePersistenceError::NotFound { house_id })?;
        let staged = stage_members(budget, members)?;
        house.name = name.to_owned();
        house.members = staged;
        Ok(())
    }

    async fn delete(&self, house_id: Uuid) -> Result<(), HousePersistenceError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.fail {
            return Err(HousePersistenceError::query("injected failure"));
        }
        state.rows.remove(&house_id);
        Ok(())
    }

    async fn is_maker(
        &self,
        house_id: Uuid,
        user: UserId,
    ) -> Result<bool, HousePersistenceError> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.fail {
            return Err(HousePersistenceError::query("injected failure"));
        }
        Ok(state
            .rows
            .get(&house_id)
            .is_some_and(|house| house.maker_id == user))
    }

    async fn exists(&self, house_id: Uuid) -> Result<bool, HousePersistenceError> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.fail {
            return Err(HousePersistenceError::query("injected failure"));
        }
        Ok(state.rows.contains_key(&house_id))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[tokio::test]
    async fn replace_swaps_the_whole_membership_set() {
        let repo = InMemoryHouseRepository::new();
        let maker = UserId::random();
        let old_member = Uuid::new_v4();
        let id = repo
            .create("Sea House", maker, &[old_member, *maker.as_uuid()])
            .await
            .expect("create");

        let new_member = Uuid::new_v4();
        repo.replace(id, "Lake House", &[new_member, *maker.as_uuid()])
            .await
            .expect("replace");

        let stored = repo.stored(id).expect("house present");
        assert_eq!(stored.name, "Lake House");
        assert_eq!(stored.members, vec![new_member, *maker.as_uuid()]);
    }

    #[tokio::test]
    async fn a_failed_membership_insert_commits_no_house_row() {
        let repo = InMemoryHouseRepository::new();
        repo.fail_member_inserts_after(1);

        let err = repo
            .create(
                "Sea House",
                UserId::random(),
                &[Uuid::new_v4(), Uuid::new_v4()],
            )
            .await
            .expect_err("must fail mid-aggregate");
        assert!(matches!(err, HousePersistenceError::Query { .. }));
        assert_eq!(repo.house_count(), 0);
    }

    #[tokio::test]
    async fn a_failed_membership_insert_during_replace_leaves_the_house_unchanged() {
        let repo = InMemoryHouseRepository::new();
        let maker = UserId::random();
        let member = Uuid::new_v4();
        let id = repo
            .create("Sea House", maker, &[member, *maker.as_uuid()])
            .await
            .expect("create");

        repo.fail_member_inserts_after(1);
        repo.replace(id, "Lake House", &[Uuid::new_v4(), *maker.as_uuid()])
            .await
            .expect_err("must fail mid-aggregate");

        let stored = repo.stored(id).expect("house present");
        assert_eq!(stored.name, "Sea House");
        assert_eq!(stored.members, vec![member, *maker.as_uuid()]);
    }

    #[tokio::test]
    async fn maker_check_is_false_for_absent_houses_and_other_users() {
        let repo = InMemoryHouseRepository::new();
        let maker = UserId::random();
        let id = repo
            .create("Sea House", maker, &[*maker.as_uuid()])
            .await
            .expect("create");

        assert!(repo.is_maker(id, maker).await.expect("check"));
        assert!(!repo.is_maker(id, UserId::random()).await.expect("check"));
        assert!(!repo
            .is_maker(Uuid::new_v4(), maker)
            .await
            .expect("check absent"));
    }
}
