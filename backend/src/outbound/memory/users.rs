//! In-memory `UserRepository`.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    EmailAddress, PasswordHash, ProfileUpdate, StoredCredentials, User, UserId, UserName,
};

use super::lock_store;

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: PasswordHash,
}

/// Users keyed by id; uniqueness is checked under the same lock as the
/// insert.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, StoredUser>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User, hash: &PasswordHash) -> Result<(), UserPersistenceError> {
        let mut users = lock_store(&self.users, UserPersistenceError::query)?;
        if users.values().any(|s| s.user.email() == user.email()) {
            return Err(UserPersistenceError::duplicate("email"));
        }
        if users.values().any(|s| s.user.name() == user.name()) {
            return Err(UserPersistenceError::duplicate("name"));
        }
        users.insert(
            *user.id(),
            StoredUser {
                user: user.clone(),
                password_hash: hash.clone(),
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let users = lock_store(&self.users, UserPersistenceError::query)?;
        Ok(users.get(id).map(|stored| stored.user.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let users = lock_store(&self.users, UserPersistenceError::query)?;
        Ok(users
            .values()
            .find(|stored| stored.user.email().as_ref() == email)
            .map(|stored| StoredCredentials {
                user: stored.user.clone(),
                password_hash: stored.password_hash.clone(),
            }))
    }

    async fn email_exists(&self, email: &EmailAddress) -> Result<bool, UserPersistenceError> {
        let users = lock_store(&self.users, UserPersistenceError::query)?;
        Ok(users.values().any(|stored| stored.user.email() == email))
    }

    async fn name_exists(&self, name: &UserName) -> Result<bool, UserPersistenceError> {
        let users = lock_store(&self.users, UserPersistenceError::query)?;
        Ok(users.values().any(|stored| stored.user.name() == name))
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut users = lock_store(&self.users, UserPersistenceError::query)?;
        Ok(users.get_mut(id).map(|stored| {
            stored.user = stored.user.with_profile(update);
            stored.user.clone()
        }))
    }
}
