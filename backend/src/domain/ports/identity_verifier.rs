//! Driving port used by the access gate to turn a bearer token into a
//! caller identity.

use async_trait::async_trait;

use crate::domain::{Error, Identity};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify a bearer token. Any failure is `forbidden`.
    async fn verify(&self, token: &str) -> Result<Identity, Error>;
}
