//! Rental Ledger service.
//!
//! New rentals always start `Pending` and carry a verbatim snapshot of the
//! requested catalogue entry. Only the requester may cancel.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info};

use crate::domain::ports::{RentalCommand, RentalQuery, RentalRepository, RentalRepositoryError};
use crate::domain::{
    CatalogueItemRef, Error, Rental, RentalId, RentalSnapshot, UserId, check_ownership,
};

/// Rental service implementing the rental driving ports.
#[derive(Clone)]
pub struct RentalService<R> {
    rentals: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> RentalService<R> {
    pub fn new(rentals: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { rentals, clock }
    }
}

impl<R> RentalService<R>
where
    R: RentalRepository,
{
    fn map_repository_error(error: RentalRepositoryError) -> Error {
        if error.is_transient() {
            Error::service_unavailable(error.to_string())
        } else {
            Error::internal(error.to_string())
        }
    }
}

#[async_trait]
impl<R> RentalCommand for RentalService<R>
where
    R: RentalRepository,
{
    async fn create_rental(
        &self,
        requester: &UserId,
        item_ref: CatalogueItemRef,
        snapshot: RentalSnapshot,
    ) -> Result<Rental, Error> {
        let rental = Rental::request(
            RentalId::random(),
            *requester,
            item_ref,
            snapshot,
            self.clock.utc(),
        );
        self.rentals
            .insert(&rental)
            .await
            .map_err(Self::map_repository_error)?;
        info!(
            rental_id = %rental.id(),
            requester = %requester,
            item_ref = %item_ref,
            "rental requested"
        );
        Ok(rental)
    }

    async fn cancel_rental(&self, requester: &UserId, id: &RentalId) -> Result<(), Error> {
        let deleted = self
            .rentals
            .delete_owned(id, requester)
            .await
            .map_err(Self::map_repository_error)?;
        if !deleted {
            return Err(Error::not_found("rental not found"));
        }
        info!(rental_id = %id, requester = %requester, "rental cancelled");
        Ok(())
    }
}

#[async_trait]
impl<R> RentalQuery for RentalService<R>
where
    R: RentalRepository,
{
    async fn list_rentals(&self, requester: &UserId) -> Result<Vec<Rental>, Error> {
        let rentals = self
            .rentals
            .list_by_requester(requester)
            .await
            .map_err(Self::map_repository_error)?;
        Ok(rentals
            .into_iter()
            .filter(|rental| {
                let owned = check_ownership(requester, rental);
                if !owned {
                    error!(rental_id = %rental.id(), caller = %requester, "dropping foreign rental");
                }
                owned
            })
            .collect())
    }
}
