//! Port for one-way credential hashing.
//!
//! Implementations are expected to be slow on purpose; adapters should move
//! the work off the async executor.

use async_trait::async_trait;

use crate::domain::{NewPassword, PasswordHash};

use super::define_port_error;

define_port_error! {
    /// Failures raised by credential hashers.
    pub enum CredentialHasherError {
        /// Hashing could not be performed.
        Hashing { message: String } => "credential hashing failed: {message}",
        /// A stored hash could not be parsed.
        MalformedHash { message: String } => "stored credential hash is malformed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// Derive a salted hash for a new password.
    async fn hash(&self, password: &NewPassword) -> Result<PasswordHash, CredentialHasherError>;

    /// Check `password` against a stored hash.
    async fn verify(
        &self,
        password: &str,
        hash: &PasswordHash,
    ) -> Result<bool, CredentialHasherError>;
}
