//! Port for storing uploaded avatar images.

use async_trait::async_trait;

use crate::domain::{AvatarImage, UserId};

use super::define_port_error;

define_port_error! {
    /// Failures raised by avatar stores.
    pub enum AvatarStoreError {
        /// The backing store could not be reached or written.
        Unavailable { message: String } => transient "avatar store unavailable: {message}",
        /// The reference was not issued by this store.
        ForeignReference { reference: String } => "avatar reference {reference} is not managed here",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AvatarStore: Send + Sync {
    /// Persist `image` for `owner` and return the public reference clients
    /// use to fetch it.
    async fn store(&self, owner: &UserId, image: &AvatarImage) -> Result<String, AvatarStoreError>;

    /// Delete a blob previously returned by [`AvatarStore::store`]. Removing
    /// a blob that is already gone succeeds.
    async fn remove(&self, reference: &str) -> Result<(), AvatarStoreError>;
}
