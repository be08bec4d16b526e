//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`, `*Service`, `IdentityVerifier`) are
//! called by inbound adapters. Driven ports (`*Repository`, hasher, assertion
//! and avatar stores) are implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod avatar_store;
mod credential_hasher;
mod identity_assertions;
mod identity_verifier;
mod item_repository;
mod listing_command;
mod listing_query;
mod login_service;
mod registration_service;
mod rental_command;
mod rental_query;
mod rental_repository;
mod user_profile_command;
mod user_profile_query;
mod user_repository;

#[cfg(test)]
pub use avatar_store::MockAvatarStore;
pub use avatar_store::{AvatarStore, AvatarStoreError};
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHasher, CredentialHasherError};
#[cfg(test)]
pub use identity_assertions::MockIdentityAssertions;
pub use identity_assertions::{IdentityAssertionError, IdentityAssertions};
pub use identity_verifier::IdentityVerifier;
#[cfg(test)]
pub use identity_verifier::MockIdentityVerifier;
pub use item_repository::{ItemRepository, ItemRepositoryError};
#[cfg(test)]
pub use item_repository::MockItemRepository;
pub use listing_command::ListingCommand;
#[cfg(test)]
pub use listing_command::MockListingCommand;
pub use listing_query::ListingQuery;
#[cfg(test)]
pub use listing_query::MockListingQuery;
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use registration_service::MockRegistrationService;
pub use registration_service::RegistrationService;
#[cfg(test)]
pub use rental_command::MockRentalCommand;
pub use rental_command::RentalCommand;
#[cfg(test)]
pub use rental_query::MockRentalQuery;
pub use rental_query::RentalQuery;
#[cfg(test)]
pub use rental_repository::MockRentalRepository;
pub use rental_repository::{RentalRepository, RentalRepositoryError};
#[cfg(test)]
pub use user_profile_command::MockUserProfileCommand;
pub use user_profile_command::UserProfileCommand;
#[cfg(test)]
pub use user_profile_query::MockUserProfileQuery;
pub use user_profile_query::UserProfileQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
