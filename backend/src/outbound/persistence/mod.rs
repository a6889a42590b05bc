//! PostgreSQL persistence adapters using Diesel.
//!
//! Thin adapters only: repository implementations translate between Diesel
//! rows and domain types, with no business logic. Row structs (`models.rs`)
//! and `diesel::table!` definitions (`schema.rs`) stay internal to this
//! module.

mod diesel_house_repository;
mod diesel_note_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_house_repository::DieselHouseRepository;
pub use diesel_note_repository::DieselNoteRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};

use diesel::{Connection, PgConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply pending migrations over a blocking connection.
///
/// Runs at startup after the connectivity check; callers wrap this in
/// `spawn_blocking` since the migration harness is synchronous.
pub fn run_migrations(database_url: &str) -> Result<(), String> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| format!("connect for migrations: {err}"))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| format!("run migrations: {err}"))?;
    Ok(())
}
