//! Listing Store service.
//!
//! Enforces single-owner exclusivity: repositories filter by `(id, owner)`,
//! and every record they return is re-checked with [`check_ownership`] before
//! it leaves the service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info};

use crate::domain::ports::{ItemRepository, ItemRepositoryError, ListingCommand, ListingQuery};
use crate::domain::{Error, Item, ItemDetails, ItemId, ItemPatch, UserId, check_ownership};

const ITEM_NOT_FOUND: &str = "item not found";

/// Listing service implementing the listing driving ports.
#[derive(Clone)]
pub struct ListingService<R> {
    items: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> ListingService<R> {
    pub fn new(items: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { items, clock }
    }
}

impl<R> ListingService<R>
where
    R: ItemRepository,
{
    fn map_repository_error(error: ItemRepositoryError) -> Error {
        if error.is_transient() {
            Error::service_unavailable(error.to_string())
        } else {
            Error::internal(error.to_string())
        }
    }

    fn owned_or_not_found(owner: &UserId, item: Option<Item>) -> Result<Item, Error> {
        match item {
            Some(item) if check_ownership(owner, &item) => Ok(item),
            Some(item) => {
                error!(item_id = %item.id(), caller = %owner, "repository returned a foreign item");
                Err(Error::not_found(ITEM_NOT_FOUND))
            }
            None => Err(Error::not_found(ITEM_NOT_FOUND)),
        }
    }
}

#[async_trait]
impl<R> ListingCommand for ListingService<R>
where
    R: ItemRepository,
{
    async fn create_item(&self, owner: &UserId, details: ItemDetails) -> Result<Item, Error> {
        let item = Item::list(ItemId::random(), *owner, details, self.clock.utc());
        self.items
            .insert(&item)
            .await
            .map_err(Self::map_repository_error)?;
        info!(item_id = %item.id(), owner = %owner, "item listed");
        Ok(item)
    }

    async fn update_item(
        &self,
        owner: &UserId,
        id: &ItemId,
        patch: ItemPatch,
    ) -> Result<Item, Error> {
        let result = if patch.is_empty() {
            self.items.find_owned(id, owner).await
        } else {
            self.items.update_owned(id, owner, &patch).await
        };
        let item = result.map_err(Self::map_repository_error)?;
        let item = Self::owned_or_not_found(owner, item)?;
        info!(item_id = %id, owner = %owner, "item updated");
        Ok(item)
    }

    async fn delete_item(&self, owner: &UserId, id: &ItemId) -> Result<(), Error> {
        let deleted = self
            .items
            .delete_owned(id, owner)
            .await
            .map_err(Self::map_repository_error)?;
        if !deleted {
            return Err(Error::not_found(ITEM_NOT_FOUND));
        }
        info!(item_id = %id, owner = %owner, "item deleted");
        Ok(())
    }
}

#[async_trait]
impl<R> ListingQuery for ListingService<R>
where
    R: ItemRepository,
{
    async fn list_items(&self, owner: &UserId) -> Result<Vec<Item>, Error> {
        let items = self
            .items
            .list_by_owner(owner)
            .await
            .map_err(Self::map_repository_error)?;
        Ok(items
            .into_iter()
            .filter(|item| {
                let owned = check_ownership(owner, item);
                if !owned {
                    error!(item_id = %item.id(), caller = %owner, "dropping foreign item from listing");
                }
                owned
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "listing_service_tests.rs"]
mod tests;
