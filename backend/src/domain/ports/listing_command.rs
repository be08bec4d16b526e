//! Driving port for listing mutations.
//!
//! Every operation is scoped to the caller. Items the caller does not own are
//! reported as `not_found`, exactly like items that do not exist.

use async_trait::async_trait;

use crate::domain::{Error, Item, ItemDetails, ItemId, ItemPatch, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingCommand: Send + Sync {
    /// List a new item owned by `owner`.
    async fn create_item(&self, owner: &UserId, details: ItemDetails) -> Result<Item, Error>;

    /// Change supplied fields of an owned item.
    async fn update_item(
        &self,
        owner: &UserId,
        id: &ItemId,
        patch: ItemPatch,
    ) -> Result<Item, Error>;

    /// Remove an owned item.
    async fn delete_item(&self, owner: &UserId, id: &ItemId) -> Result<(), Error>;
}
