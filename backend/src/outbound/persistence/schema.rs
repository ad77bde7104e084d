//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `backend/migrations` exactly.

diesel::table! {
    /// Registered accounts. `email` is unique and stored lowercase.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        /// Argon2 hash in PHC string format.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Job applications, each owned by exactly one user.
    jobs (id) {
        id -> Uuid,
        company -> Varchar,
        position -> Varchar,
        status -> Varchar,
        /// Owning user; rows cascade when the user is deleted.
        created_by -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(jobs -> users (created_by));
diesel::allow_tables_to_appear_in_same_query!(jobs, users);
