//! Argon2id implementation of the `CredentialHasher` port.
//!
//! Hashing is CPU-bound, so both operations run on Tokio's blocking pool and
//! copy the plaintext into a zeroising buffer first.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash as PhcHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::ports::{CredentialHasher, CredentialHasherError};
use crate::domain::{NewPassword, PasswordHash};

/// Argon2id hasher with configurable cost parameters.
#[derive(Clone)]
pub struct Argon2CredentialHasher {
    params: Params,
}

impl Argon2CredentialHasher {
    /// Hasher using the `argon2` crate's recommended parameters.
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Hasher with explicit parameters; lets tests trade strength for speed.
    pub fn with_params(params: Params) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2CredentialHasher {
    fn default() -> Self {
        Self::new()
    }
}

fn hash_blocking(argon2: &Argon2<'_>, password: &[u8]) -> Result<String, CredentialHasherError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(password, &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| CredentialHasherError::hashing(err.to_string()))
}

fn verify_blocking(
    argon2: &Argon2<'_>,
    password: &[u8],
    stored: &str,
) -> Result<bool, CredentialHasherError> {
    let parsed =
        PhcHash::new(stored).map_err(|err| CredentialHasherError::malformed_hash(err.to_string()))?;
    match argon2.verify_password(password, &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(CredentialHasherError::hashing(err.to_string())),
    }
}

fn join_error(err: tokio::task::JoinError) -> CredentialHasherError {
    CredentialHasherError::hashing(format!("hashing task aborted: {err}"))
}

#[async_trait]
impl CredentialHasher for Argon2CredentialHasher {
    async fn hash(&self, password: &NewPassword) -> Result<PasswordHash, CredentialHasherError> {
        let argon2 = self.argon2();
        let secret = Zeroizing::new(password.expose().as_bytes().to_vec());
        let phc = tokio::task::spawn_blocking(move || hash_blocking(&argon2, &secret))
            .await
            .map_err(join_error)??;
        Ok(PasswordHash::new(phc))
    }

    async fn verify(
        &self,
        password: &str,
        hash: &PasswordHash,
    ) -> Result<bool, CredentialHasherError> {
        let argon2 = self.argon2();
        let secret = Zeroizing::new(password.as_bytes().to_vec());
        let stored = hash.as_str().to_owned();
        tokio::task::spawn_blocking(move || verify_blocking(&argon2, &secret, &stored))
            .await
            .map_err(join_error)?
    }
}
