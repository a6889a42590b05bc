//! House aggregate service: transactional create/replace/delete with maker
//! authorization.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::ports::HouseRepository;
use crate::domain::user::UserId;
use crate::domain::Error;

/// Use-case service for house aggregates.
///
/// The acting user's identity always ends up in the membership set, even
/// when omitted from the submitted roommate list. Mutation and deletion are
/// gated on the maker identity and fail closed.
#[derive(Clone)]
pub struct HouseService {
    houses: Arc<dyn HouseRepository>,
}

impl HouseService {
    pub fn new(houses: Arc<dyn HouseRepository>) -> Self {
        Self { houses }
    }

    /// Create a house made by `acting`, with the filtered roommates plus
    /// the maker as members.
    pub async fn create(
        &self,
        acting: UserId,
        name: &str,
        roommates: &[Uuid],
    ) -> Result<Uuid, Error> {
        let members = membership_set(acting, roommates);
        self.houses
            .create(name, acting, &members)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "house creation failed");
                Error::internal("unable to create this house")
            })
    }

    /// Replace the house's name and full membership set.
    ///
    /// Requires `acting` to be the maker; checked before any mutation.
    pub async fn replace(
        &self,
        acting: UserId,
        house_id: Uuid,
        name: &str,
        roommates: &[Uuid],
    ) -> Result<(), Error> {
        self.ensure_maker(house_id, acting).await?;
        let members = membership_set(acting, roommates);
        self.houses
            .replace(house_id, name, &members)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, %house_id, "house replace failed");
                Error::internal("unable to update this house")
            })
    }

    /// Delete the house; membership rows cascade at the storage layer.
    pub async fn delete(&self, acting: UserId, house_id: Uuid) -> Result<(), Error> {
        self.ensure_maker(house_id, acting).await?;
        self.houses.delete(house_id).await.map_err(|err| {
            tracing::error!(error = %err, %house_id, "house delete failed");
            Error::internal("unable to delete this house")
        })
    }

    /// Whether the house row exists; used before attaching notes.
    pub async fn exists(&self, house_id: Uuid) -> Result<bool, Error> {
        self.houses.exists(house_id).await.map_err(|err| {
            tracing::error!(error = %err, %house_id, "house lookup failed");
            Error::internal("unable to load this house")
        })
    }

    /// Authorization gate: only the maker may mutate.
    ///
    /// A store failure is logged server-side and answered exactly like a
    /// failed check, so a caller cannot distinguish the two.
    async fn ensure_maker(&self, house_id: Uuid, user: UserId) -> Result<(), Error> {
        let is_maker = match self.houses.is_maker(house_id, user).await {
            Ok(is_maker) => is_maker,
            Err(err) => {
                tracing::error!(error = %err, %house_id, "maker check failed");
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

/// Filtered roommates plus the maker, deduplicated, order preserved.
fn membership_set(maker: UserId, roommates: &[Uuid]) -> Vec<Uuid> {
    let mut members: Vec<Uuid> = Vec::with_capacity(roommates.len() + 1);
    for id in roommates {
        if !members.contains(id) {
            members.push(*id);
        }
    }
    if !members.contains(maker.as_uuid()) {
        members.push(*maker.as_uuid());
    }
    members
}
