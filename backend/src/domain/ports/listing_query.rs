//! Driving port for reading the caller's listings.

use async_trait::async_trait;

use crate::domain::{Error, Item, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingQuery: Send + Sync {
    /// Items owned by `owner`, newest first.
    async fn list_items(&self, owner: &UserId) -> Result<Vec<Item>, Error>;
}
