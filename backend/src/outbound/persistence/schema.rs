//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `name` and `email` carry unique constraints
    /// (`users_name_key`, `users_email_key`).
    users (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        /// PHC-formatted Argon2id hash; never leaves the persistence layer
        /// except through credential lookups.
        password_hash -> Text,
        phone -> Nullable<Varchar>,
        address -> Nullable<Varchar>,
        avatar_url -> Nullable<Text>,
        created_at -> Timestamptz,
        /// Maintained by the `users_touch_updated_at` trigger.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Listings offered for rent.
    items (id) {
        id -> Uuid,
        owner_id -> Uuid,
        title -> Varchar,
        description -> Text,
        price -> Numeric,
        location -> Varchar,
        category -> Varchar,
        image_url -> Text,
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Rental requests with snapshot copies of the catalogue entry.
    rentals (id) {
        id -> Uuid,
        requester_id -> Uuid,
        /// External catalogue reference; no foreign key.
        item_ref -> Int8,
        title -> Text,
        price -> Numeric,
        image -> Text,
        location -> Text,
        description -> Nullable<Text>,
        status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(items -> users (owner_id));
diesel::joinable!(rentals -> users (requester_id));

diesel::allow_tables_to_appear_in_same_query!(users, items, rentals);
