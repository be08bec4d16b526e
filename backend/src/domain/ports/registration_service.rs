//! Driving port for account registration.

use async_trait::async_trait;

use crate::domain::{AuthenticatedSession, Error, RegistrationRequest};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Create a user and sign them in.
    ///
    /// Fails with `conflict` when the email or name is taken; the email is
    /// checked first.
    async fn register(&self, request: RegistrationRequest) -> Result<AuthenticatedSession, Error>;
}
