//! Port for rental ledger persistence.

use async_trait::async_trait;

use crate::domain::{Rental, RentalId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by rental repository adapters.
    pub enum RentalRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => transient "rental repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "rental repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RentalRepository: Send + Sync {
    /// Persist a new rental request.
    async fn insert(&self, rental: &Rental) -> Result<(), RentalRepositoryError>;

    /// Rentals requested by `requester`, newest first.
    async fn list_by_requester(
        &self,
        requester: &UserId,
    ) -> Result<Vec<Rental>, RentalRepositoryError>;

    /// Delete a rental only when `requester` placed it; `false` otherwise.
    async fn delete_owned(
        &self,
        id: &RentalId,
        requester: &UserId,
    ) -> Result<bool, RentalRepositoryError>;
}
