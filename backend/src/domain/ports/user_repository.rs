//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{
    EmailAddress, PasswordHash, ProfileUpdate, StoredCredentials, User, UserId, UserName,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => transient "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A unique constraint rejected the write; `field` is `name` or `email`.
        Duplicate { field: String } => "user {field} already in use",
    }
}

/// Storage for user records and their credential hashes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Fails with `Duplicate` if the name or email exists.
    async fn insert(&self, user: &User, hash: &PasswordHash) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user and credential hash by normalised email.
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;

    /// Whether any user already uses `email`.
    async fn email_exists(&self, email: &EmailAddress) -> Result<bool, UserPersistenceError>;

    /// Whether any user already uses `name`.
    async fn name_exists(&self, name: &UserName) -> Result<bool, UserPersistenceError>;

    /// Apply safelisted profile changes, returning the updated user or `None`
    /// when the record no longer exists.
    async fn update_profile(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, UserPersistenceError>;
}
