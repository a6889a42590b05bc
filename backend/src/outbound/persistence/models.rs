//! Internal Diesel row structs for database operations.
//!
//! Implementation details of the persistence layer; never exposed to the
//! domain.

use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{house_members, houses, notes, users};

/// Insertable struct for creating account records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub username: &'a str,
    pub password_hash: &'a str,
}

/// Credential columns read for a sign-in attempt.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct CredentialsRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

/// Insertable struct for creating house records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = houses)]
pub(crate) struct NewHouseRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub maker_id: Uuid,
}

/// Insertable struct for membership rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = house_members)]
pub(crate) struct NewHouseMemberRow {
    pub house_id: Uuid,
    pub user_id: Uuid,
}

/// Insertable struct for creating note records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notes)]
pub(crate) struct NewNoteRow<'a> {
    pub id: Uuid,
    pub house_id: Uuid,
    pub maker_id: Uuid,
    pub title: &'a str,
    pub content: &'a str,
}
