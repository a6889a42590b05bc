//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; `diesel
//! print-schema` can regenerate them from a live database.

diesel::table! {
    /// Registered accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Sign-in email; unique.
        email -> Varchar,
        /// Public username; unique.
        username -> Varchar,
        /// Argon2id hash in PHC string format.
        password_hash -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Roommate groups.
    houses (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// House display name.
        name -> Varchar,
        /// Account that created the house; sole identity allowed to
        /// modify or delete it.
        maker_id -> Uuid,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Membership rows joining users to houses.
    house_members (house_id, user_id) {
        house_id -> Uuid,
        user_id -> Uuid,
    }
}

diesel::table! {
    /// Notes attached to a house.
    notes (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning house; immutable after creation.
        house_id -> Uuid,
        /// Account that created the note.
        maker_id -> Uuid,
        title -> Varchar,
        content -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(house_members -> houses (house_id));
diesel::joinable!(notes -> houses (house_id));

diesel::allow_tables_to_appear_in_same_query!(users, houses, house_members, notes);
