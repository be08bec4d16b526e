//! Driving port for rental requests.

use async_trait::async_trait;

use crate::domain::{CatalogueItemRef, Error, Rental, RentalId, RentalSnapshot, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RentalCommand: Send + Sync {
    /// Record a new `Pending` rental requested by `requester`.
    async fn create_rental(
        &self,
        requester: &UserId,
        item_ref: CatalogueItemRef,
        snapshot: RentalSnapshot,
    ) -> Result<Rental, Error>;

    /// Cancel a rental the caller requested; `not_found` otherwise.
    async fn cancel_rental(&self, requester: &UserId, id: &RentalId) -> Result<(), Error>;
}
