//! Port for listing persistence.
//!
//! Every lookup and mutation that targets a single item takes the caller's
//! [`UserId`] and must apply `(id, owner)` as one predicate.

use async_trait::async_trait;

use crate::domain::{Item, ItemId, ItemPatch, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by item repository adapters.
    pub enum ItemRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => transient "item repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "item repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Persist a new item.
    async fn insert(&self, item: &Item) -> Result<(), ItemRepositoryError>;

    /// Items owned by `owner`, newest first.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Item>, ItemRepositoryError>;

    /// Item with `id` if and only if `owner` owns it.
    async fn find_owned(
        &self,
        id: &ItemId,
        owner: &UserId,
    ) -> Result<Option<Item>, ItemRepositoryError>;

    /// Apply a non-empty patch to an owned item and return the new state.
    async fn update_owned(
        &self,
        id: &ItemId,
        owner: &UserId,
        patch: &ItemPatch,
    ) -> Result<Option<Item>, ItemRepositoryError>;

    /// Delete an owned item; `false` when nothing matched.
    async fn delete_owned(&self, id: &ItemId, owner: &UserId) -> Result<bool, ItemRepositoryError>;
}
