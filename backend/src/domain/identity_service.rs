//! Identity Store service.
//!
//! Implements registration, login, bearer verification, and profile use-cases
//! on top of the user repository, credential hasher, identity assertion, and
//! avatar store ports.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    AvatarStore, AvatarStoreError, CredentialHasher, CredentialHasherError,
    IdentityAssertionError, IdentityAssertions, IdentityVerifier, LoginService,
    RegistrationService, UserPersistenceError, UserProfileCommand, UserProfileQuery,
    UserRepository,
};
use crate::domain::{
    AuthenticatedSession, AvatarImage, Error, Identity, LoginCredentials, NewPassword,
    PasswordHash, ProfileUpdate, RegistrationRequest, User, UserId,
};

/// Message shared by every failed login so callers cannot enumerate accounts.
const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Password hashed once per service to give unknown-email logins a real
/// verification to run.
const DECOY_PASSWORD: &str = "decoy-credential-0";

/// Identity service implementing the account and profile driving ports.
#[derive(Clone)]
pub struct IdentityService<U> {
    users: Arc<U>,
    hasher: Arc<dyn CredentialHasher>,
    assertions: Arc<dyn IdentityAssertions>,
    avatars: Arc<dyn AvatarStore>,
    clock: Arc<dyn Clock>,
    decoy_hash: Arc<OnceCell<PasswordHash>>,
}

impl<U> IdentityService<U> {
    /// Create a new service from its collaborators.
    pub fn new(
        users: Arc<U>,
        hasher: Arc<dyn CredentialHasher>,
        assertions: Arc<dyn IdentityAssertions>,
        avatars: Arc<dyn AvatarStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            assertions,
            avatars,
            clock,
            decoy_hash: Arc::new(OnceCell::new()),
        }
    }
}

impl<U> IdentityService<U>
where
    U: UserRepository,
{
    /// Run a full password verification against the decoy hash so an
    /// unknown email costs as much as a wrong password. The outcome is
    /// discarded.
    async fn verify_against_decoy(&self, password: &str) {
        let decoy = self
            .decoy_hash
            .get_or_try_init(|| async {
                let seed = NewPassword::new(DECOY_PASSWORD).map_err(|e| e.to_string())?;
                self.hasher.hash(&seed).await.map_err(|e| e.to_string())
            })
            .await;
        match decoy {
            Ok(hash) => {
                if let Err(error) = self.hasher.verify(password, hash).await {
                    warn!(%error, "decoy verification failed");
                }
            }
            Err(error) => warn!(%error, "decoy hash unavailable"),
        }
    }

    fn map_user_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Duplicate { field } => Self::taken(&field),
            other if other.is_transient() => Error::service_unavailable(other.to_string()),
            other => Error::internal(other.to_string()),
        }
    }

    fn map_hasher_error(error: CredentialHasherError) -> Error {
        Error::internal(error.to_string())
    }

    fn map_avatar_error(error: AvatarStoreError) -> Error {
        if error.is_transient() {
            Error::service_unavailable(error.to_string())
        } else {
            Error::internal(error.to_string())
        }
    }

    fn taken(field: &str) -> Error {
        let (message, code) = match field {
            "name" => ("Username already in use", "name_taken"),
            _ => ("Email already in use", "email_taken"),
        };
        let field = if field == "name" { "name" } else { "email" };
        Error::conflict(message).with_details(json!({ "field": field, "code": code }))
    }

    fn issue(&self, user: User) -> Result<AuthenticatedSession, Error> {
        let assertion = self
            .assertions
            .issue(&Identity::from(&user), self.clock.utc())
            .map_err(|err| Error::internal(err.to_string()))?;
        Ok(AuthenticatedSession { user, assertion })
    }

    async fn load_user(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(Self::map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    async fn apply_update(&self, user_id: &UserId, update: &ProfileUpdate) -> Result<User, Error> {
        if update.is_noop() {
            return self.load_user(user_id).await;
        }
        self.users
            .update_profile(user_id, update)
            .await
            .map_err(Self::map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }
}

#[async_trait]
impl<U> RegistrationService for IdentityService<U>
where
    U: UserRepository,
{
    async fn register(&self, request: RegistrationRequest) -> Result<AuthenticatedSession, Error> {
        if self
            .users
            .email_exists(request.email())
            .await
            .map_err(Self::map_user_error)?
        {
            return Err(Self::taken("email"));
        }
        if self
            .users
            .name_exists(request.name())
            .await
            .map_err(Self::map_user_error)?
        {
            return Err(Self::taken("name"));
        }

        let hash = self
            .hasher
            .hash(request.password())
            .await
            .map_err(Self::map_hasher_error)?;
        let user = User::register(
            UserId::random(),
            request.name().clone(),
            request.email().clone(),
            self.clock.utc(),
        );
        // A concurrent registration can still win the race; the unique
        // indexes report it as `Duplicate`.
        self.users
            .insert(&user, &hash)
            .await
            .map_err(Self::map_user_error)?;

        info!(user_id = %user.id(), "user registered");
        self.issue(user)
    }
}

#[async_trait]
impl<U> LoginService for IdentityService<U>
where
    U: UserRepository,
{
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedSession, Error> {
        let Some(stored) = self
            .users
            .find_credentials_by_email(credentials.email())
            .await
            .map_err(Self::map_user_error)?
        else {
            self.verify_against_decoy(credentials.password()).await;
            debug!("login rejected: unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let verified = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .await
            .map_err(Self::map_hasher_error)?;
        if !verified {
            debug!(user_id = %stored.user.id(), "login rejected: password mismatch");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        info!(user_id = %stored.user.id(), "user logged in");
        self.issue(stored.user)
    }
}

#[async_trait]
impl<U> IdentityVerifier for IdentityService<U>
where
    U: UserRepository,
{
    async fn verify(&self, token: &str) -> Result<Identity, Error> {
        self.assertions
            .verify(token, self.clock.utc())
            .map_err(|err| {
                warn!(error = %err, "bearer token rejected");
                match err {
                    IdentityAssertionError::Expired => Error::forbidden("token expired"),
                    IdentityAssertionError::Invalid { .. } => Error::forbidden("invalid token"),
                    IdentityAssertionError::Issue { message } => Error::internal(message),
                }
            })
    }
}

#[async_trait]
impl<U> UserProfileQuery for IdentityService<U>
where
    U: UserRepository,
{
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error> {
        self.load_user(user_id).await
    }
}

#[async_trait]
impl<U> UserProfileCommand for IdentityService<U>
where
    U: UserRepository,
{
    async fn update_profile(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<User, Error> {
        let user = self.apply_update(user_id, &update).await?;
        info!(user_id = %user_id, "profile updated");
        Ok(user)
    }

    async fn upload_avatar(&self, user_id: &UserId, image: AvatarImage) -> Result<User, Error> {
        self.load_user(user_id).await?;
        let reference = self
            .avatars
            .store(user_id, &image)
            .await
            .map_err(Self::map_avatar_error)?;
        let user = match self
            .apply_update(user_id, &ProfileUpdate::avatar_only(reference.clone()))
            .await
        {
            Ok(user) => user,
            Err(error) => {
                if let Err(cleanup) = self.avatars.remove(&reference).await {
                    warn!(
                        user_id = %user_id,
                        %reference,
                        error = %cleanup,
                        "orphaned avatar left behind"
                    );
                }
                return Err(error);
            }
        };
        info!(user_id = %user_id, format = %image.format(), "avatar uploaded");
        Ok(user)
    }
}

#[cfg(test)]
#[path = "identity_service_tests.rs"]
mod tests;
