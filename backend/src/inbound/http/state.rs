//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    IdentityVerifier, ListingCommand, ListingQuery, LoginService, RegistrationService,
    RentalCommand, RentalQuery, UserProfileCommand, UserProfileQuery,
};

/// Parameter object bundling the Identity Store ports.
#[derive(Clone)]
pub struct IdentityPorts {
    pub registration: Arc<dyn RegistrationService>,
    pub login: Arc<dyn LoginService>,
    pub verifier: Arc<dyn IdentityVerifier>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub profile_command: Arc<dyn UserProfileCommand>,
}

/// Parameter object bundling the Listing Store and Rental Ledger ports.
#[derive(Clone)]
pub struct MarketplacePorts {
    pub listings: Arc<dyn ListingCommand>,
    pub listings_query: Arc<dyn ListingQuery>,
    pub rentals: Arc<dyn RentalCommand>,
    pub rentals_query: Arc<dyn RentalQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn RegistrationService>,
    pub login: Arc<dyn LoginService>,
    pub verifier: Arc<dyn IdentityVerifier>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub profile_command: Arc<dyn UserProfileCommand>,
    pub listings: Arc<dyn ListingCommand>,
    pub listings_query: Arc<dyn ListingQuery>,
    pub rentals: Arc<dyn RentalCommand>,
    pub rentals_query: Arc<dyn RentalQuery>,
}

impl HttpState {
    /// Construct state from the identity and marketplace port bundles.
    pub fn new(identity: IdentityPorts, marketplace: MarketplacePorts) -> Self {
        let IdentityPorts {
            registration,
            login,
            verifier,
            profile,
            profile_command,
        } = identity;
        let MarketplacePorts {
            listings,
            listings_query,
            rentals,
            rentals_query,
        } = marketplace;
        Self {
            registration,
            login,
            verifier,
            profile,
            profile_command,
            listings,
            listings_query,
            rentals,
            rentals_query,
        }
    }
}
