//! PostgreSQL-backed `HouseRepository` implementation using Diesel.
//!
//! Aggregate writes (house row plus membership rows) run inside one
//! transaction so a failed membership insert rolls the whole mutation back.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{HousePersistenceError, HouseRepository};
use crate::domain::user::UserId;

use super::models::{NewHouseMemberRow, NewHouseRow};
use super::pool::{DbPool, PoolError};
use super::schema::{house_members, houses};

/// Diesel-backed implementation of the `HouseRepository` port.
#[derive(Clone)]
pub struct DieselHouseRepository {
    pool: DbPool,
}

impl DieselHouseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> HousePersistenceError {
    HousePersistenceError::connection(error.to_string())
}

fn map_diesel_error(error: diesel::result::Error) -> HousePersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            HousePersistenceError::connection("database connection error")
        }
        _ => HousePersistenceError::query("database error"),
    }
}

fn member_rows(house_id: Uuid, members: &[Uuid]) -> Vec<NewHouseMemberRow> {
    members
        .iter()
        .map(|user_id| NewHouseMemberRow {
            house_id,
            user_id: *user_id,
        })
        .collect()
}

#[async_trait]
impl HouseRepository for DieselHouseRepository {
    async fn create(
        &self,
        name: &str,
        maker: UserId,
        members: &[Uuid],
    ) -> Result<Uuid, HousePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = Uuid::new_v4();
        let house_row = NewHouseRow {
            id,
            name,
            maker_id: *maker.as_uuid(),
        };
        let membership = member_rows(id, members);

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(houses::table)
                    .values(&house_row)
                    .execute(conn)
                    .await?;
                diesel::insert_into(house_members::table)
                    .values(&membership)
                    .execute(conn)
                    .await?;
                Ok::<(), diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?;

        Ok(id)
    }

    async fn replace(
        &self,
        house_id: Uuid,
        name: &str,
        members: &[Uuid],
    ) -> Result<(), HousePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let membership = member_rows(house_id, members);

        let updated = conn
            .transaction(|conn| {
                async move {
                    let updated = diesel::update(houses::table.find(house_id))
                        .set(houses::name.eq(name))
                        .execute(conn)
                        .await?;
                    if updated == 0 {
                        // Nothing to replace; roll back before touching
                        // membership rows.
                        return Ok(0);
                    }
                    diesel::delete(
                        house_members::table.filter(house_members::house_id.eq(house_id)),
                    )
                    .execute(conn)
                    .await?;
                    diesel::insert_into(house_members::table)
                        .values(&membership)
                        .execute(conn)
                        .await?;
                    Ok::<usize, diesel::result::Error>(updated)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        if updated == 0 {
            return Err(HousePersistenceError::NotFound { house_id });
        }
        Ok(())
    }

    async fn delete(&self, house_id: Uuid) -> Result<(), HousePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Membership rows cascade via the schema's foreign key.
        diesel::delete(houses::table.find(house_id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn is_maker(
        &self,
        house_id: Uuid,
        user: UserId,
    ) -> Result<bool, HousePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(exists(
            houses::table
                .find(house_id)
                .filter(houses::maker_id.eq(user.as_uuid())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn exists(&self, house_id: Uuid) -> Result<bool, HousePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(exists(houses::table.find(house_id)))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}
