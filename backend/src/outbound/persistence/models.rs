//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain aggregates re-run
//! the domain validation so corrupt rows surface as query errors.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::schema::{items, rentals, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for registering a user.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
    pub avatar_url: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

/// Changeset for profile updates.
///
/// The outer `Option` skips a column; `Some(None)` writes `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct ProfileChangeset<'a> {
    pub phone: Option<Option<&'a str>>,
    pub address: Option<Option<&'a str>>,
    pub avatar_url: Option<Option<&'a str>>,
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// Row struct for reading from the items table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ItemRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub location: String,
    pub category: String,
    pub image_url: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for new listings.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = items)]
pub(crate) struct NewItemRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub price: Decimal,
    pub location: &'a str,
    pub category: &'a str,
    pub image_url: &'a str,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Changeset for partial listing updates; `None` columns are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = items)]
pub(crate) struct ItemChangeset<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub price: Option<Decimal>,
    pub location: Option<&'a str>,
    pub category: Option<&'a str>,
    pub image_url: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Rentals
// ---------------------------------------------------------------------------

/// Row struct for reading from the rentals table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = rentals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RentalRow {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub item_ref: i64,
    pub title: String,
    pub price: Decimal,
    pub image: String,
    pub location: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for rental requests.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = rentals)]
pub(crate) struct NewRentalRow<'a> {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub item_ref: i64,
    pub title: &'a str,
    pub price: Decimal,
    pub image: &'a str,
    pub location: &'a str,
    pub description: Option<&'a str>,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
}
