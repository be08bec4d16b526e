//! PostgreSQL-backed `RentalRepository` implementation using Diesel ORM.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{RentalRepository, RentalRepositoryError};
use crate::domain::{
    CatalogueItemRef, OwnedResource, Price, Rental, RentalDraft, RentalId, RentalSnapshot,
    RentalStatus, RentalValidationError, SnapshotText, UserId,
};

use super::diesel_error_mapping::map_basic_diesel_error;
use super::models::{NewRentalRow, RentalRow};
use super::pool::{DbPool, PoolError};
use super::schema::rentals;

/// Diesel-backed implementation of the [`RentalRepository`] port.
#[derive(Clone)]
pub struct DieselRentalRepository {
    pool: DbPool,
}

impl DieselRentalRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RentalRepositoryError {
    RentalRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> RentalRepositoryError {
    map_basic_diesel_error(
        error,
        RentalRepositoryError::query,
        RentalRepositoryError::connection,
    )
}

fn row_to_rental(row: RentalRow) -> Result<Rental, RentalRepositoryError> {
    let id = row.id;
    let build = move || -> Result<Rental, RentalValidationError> {
        let snapshot = RentalSnapshot {
            title: SnapshotText::new(row.title, "title")?,
            price: Price::new(row.price)?,
            image: SnapshotText::new(row.image, "image")?,
            location: SnapshotText::new(row.location, "location")?,
            description: row
                .description
                .map(|text| SnapshotText::new(text, "description"))
                .transpose()?,
        };
        Ok(Rental::from(RentalDraft {
            id: RentalId::from_uuid(row.id),
            requester: UserId::from_uuid(row.requester_id),
            item_ref: CatalogueItemRef::new(row.item_ref)?,
            snapshot,
            status: RentalStatus::from_str(&row.status)?,
            created_at: row.created_at,
        }))
    };
    build().map_err(|err| {
        warn!(rental_id = %id, error = %err, "stored rental row failed validation");
        RentalRepositoryError::query("stored rental row is invalid")
    })
}

#[async_trait]
impl RentalRepository for DieselRentalRepository {
    async fn insert(&self, rental: &Rental) -> Result<(), RentalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let snapshot = rental.snapshot();
        let row = NewRentalRow {
            id: *rental.id().as_uuid(),
            requester_id: *rental.owner().as_uuid(),
            item_ref: rental.item_ref().get(),
            title: snapshot.title.as_ref(),
            price: snapshot.price.amount(),
            image: snapshot.image.as_ref(),
            location: snapshot.location.as_ref(),
            description: snapshot.description.as_ref().map(SnapshotText::as_ref),
            status: rental.status().as_str(),
            created_at: rental.created_at(),
        };
        diesel::insert_into(rentals::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_by_requester(
        &self,
        requester: &UserId,
    ) -> Result<Vec<Rental>, RentalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RentalRow> = rentals::table
            .filter(rentals::requester_id.eq(*requester.as_uuid()))
            .order((rentals::created_at.desc(), rentals::id.desc()))
            .select(RentalRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_rental).collect()
    }

    async fn delete_owned(
        &self,
        id: &RentalId,
        requester: &UserId,
    ) -> Result<bool, RentalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            rentals::table
                .filter(rentals::id.eq(*id.as_uuid()))
                .filter(rentals::requester_id.eq(*requester.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
