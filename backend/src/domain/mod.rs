//! Domain primitives, aggregates, and services.
//!
//! Purpose: Define strongly typed entities for the Identity Store, Listing
//! Store, and Rental Ledger, the ownership capability they share, and the
//! services that implement the driving ports. Keep types immutable and
//! document invariants in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, Item, Rental: the three aggregates.
//! - OwnedResource / check_ownership: single-owner exclusivity.
//! - IdentityService, ListingService, RentalService: driving port impls.

pub mod auth;
pub mod avatar;
pub mod error;
pub mod identity_service;
pub mod listing;
pub mod listing_service;
pub mod ownership;
pub mod ports;
pub mod price;
pub mod rental;
pub mod rental_service;
pub mod trace_id;
pub mod user;

pub use self::auth::{
    AuthenticatedSession, CredentialValidationError, Identity, IssuedAssertion,
    LoginCredentials, NewPassword, PASSWORD_MAX, PASSWORD_MIN, PasswordHash,
    RegistrationRequest, RegistrationValidationError, StoredCredentials,
};
pub use self::avatar::{AVATAR_MAX_BYTES, AvatarFormat, AvatarImage, AvatarValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::identity_service::IdentityService;
pub use self::listing::{
    Category, Description, ImageUrl, Item, ItemDetails, ItemDraft, ItemId, ItemPatch, ItemStatus,
    ListingValidationError, Location, Title,
};
pub use self::listing_service::ListingService;
pub use self::ownership::{OwnedResource, check_ownership};
pub use self::price::{Price, PriceValidationError};
pub use self::rental::{
    CatalogueItemRef, Rental, RentalDraft, RentalId, RentalSnapshot, RentalStatus,
    RentalValidationError, SnapshotText,
};
pub use self::rental_service::RentalService;
pub use self::trace_id::TraceId;
pub use self::user::{
    EmailAddress, FieldUpdate, ProfileUpdate, User, UserDraft, UserId, UserName,
    UserValidationError, normalise_email,
};
