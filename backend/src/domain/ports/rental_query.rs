//! Driving port for reading the caller's rentals.

use async_trait::async_trait;

use crate::domain::{Error, Rental, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RentalQuery: Send + Sync {
    /// Rentals requested by `requester`, newest first.
    async fn list_rentals(&self, requester: &UserId) -> Result<Vec<Rental>, Error>;
}
