//! Credential adapters: Argon2id password hashing and HS256 JWT identity
//! assertions.

mod argon2_hasher;
mod jwt_assertions;

pub use argon2_hasher::Argon2CredentialHasher;
pub use jwt_assertions::JwtIdentityAssertions;
