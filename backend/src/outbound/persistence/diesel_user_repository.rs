//! PostgreSQL-backed `UserRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::user::{NewUser, StoredCredentials, UserId, UserMatch};

use super::models::{CredentialsRow, NewUserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Most suggestions the roommate search returns at once.
const SEARCH_LIMIT: i64 = 10;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(error.to_string())
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserPersistenceError::DuplicateIdentity
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        _ => UserPersistenceError::query("database error"),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<UserId, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = Uuid::new_v4();
        let row = NewUserRow {
            id,
            email: &user.email,
            username: &user.username,
            password_hash: &user.password_hash,
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(UserId::from_uuid(id))
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CredentialsRow> = users::table
            .filter(users::email.eq(email))
            .select((users::id, users::username, users::password_hash))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(|row| StoredCredentials {
            id: UserId::from_uuid(row.id),
            username: row.username,
            password_hash: row.password_hash,
        }))
    }

    async fn search_usernames(
        &self,
        prefix: &str,
        exclude: &[String],
    ) -> Result<Vec<UserMatch>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Escape LIKE metacharacters so user input only ever matches as a
        // literal prefix.
        let pattern = format!(
            "{}%",
            prefix.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
        );
        let rows: Vec<(Uuid, String)> = users::table
            .filter(users::username.like(pattern))
            .filter(users::username.ne_all(exclude))
            .select((users::id, users::username))
            .order(users::username.asc())
            .limit(SEARCH_LIMIT)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|(id, username)| UserMatch {
                id: UserId::from_uuid(id),
                username,
            })
            .collect())
    }
}
