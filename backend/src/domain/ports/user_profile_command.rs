//! Driving port for profile mutations.

use async_trait::async_trait;

use crate::domain::{AvatarImage, Error, ProfileUpdate, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileCommand: Send + Sync {
    /// Apply safelisted profile changes for the caller.
    async fn update_profile(&self, user_id: &UserId, update: ProfileUpdate)
    -> Result<User, Error>;

    /// Store a new avatar image and point the profile at it.
    async fn upload_avatar(&self, user_id: &UserId, image: AvatarImage) -> Result<User, Error>;
}
