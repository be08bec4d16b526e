//! Port for issuing and verifying bearer identity assertions.
//!
//! The domain never inspects the token format. Adapters decide how the
//! identity is encoded and signed.

use chrono::{DateTime, Utc};

use crate::domain::{Identity, IssuedAssertion};

use super::define_port_error;

define_port_error! {
    /// Failures raised while issuing or verifying assertions.
    pub enum IdentityAssertionError {
        /// The token is malformed or its signature does not verify.
        Invalid { message: String } => "identity assertion rejected: {message}",
        /// The token was valid once but has expired.
        Expired => "identity assertion expired",
        /// A token could not be produced.
        Issue { message: String } => "identity assertion could not be issued: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait IdentityAssertions: Send + Sync {
    /// Sign an assertion for `identity`, valid from `now`.
    fn issue(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<IssuedAssertion, IdentityAssertionError>;

    /// Verify `token` as of `now` and recover the identity it asserts.
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, IdentityAssertionError>;
}
