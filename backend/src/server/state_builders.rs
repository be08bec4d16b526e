//! Wire repositories and adapters into the services behind [`HttpState`].

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use rentease::domain::ports::{
    AvatarStore, CredentialHasher, IdentityAssertions, ItemRepository, RentalRepository,
    UserRepository,
};
use rentease::domain::{IdentityService, ListingService, RentalService};
use rentease::inbound::http::state::{HttpState, IdentityPorts, MarketplacePorts};
use rentease::outbound::credentials::Argon2CredentialHasher;
use rentease::outbound::memory::{
    InMemoryItemRepository, InMemoryRentalRepository, InMemoryUserRepository,
};
use rentease::outbound::persistence::{
    DieselItemRepository, DieselRentalRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Adapters shared by every service regardless of storage.
struct Collaborators {
    hasher: Arc<dyn CredentialHasher>,
    assertions: Arc<dyn IdentityAssertions>,
    avatars: Arc<dyn AvatarStore>,
    clock: Arc<dyn Clock>,
}

fn wire<U, I, R>(users: U, items: I, rentals: R, shared: Collaborators) -> HttpState
where
    U: UserRepository + 'static,
    I: ItemRepository + 'static,
    R: RentalRepository + 'static,
{
    let identity = Arc::new(IdentityService::new(
        Arc::new(users),
        shared.hasher,
        shared.assertions,
        shared.avatars,
        shared.clock.clone(),
    ));
    let listings = Arc::new(ListingService::new(Arc::new(items), shared.clock.clone()));
    let rentals = Arc::new(RentalService::new(Arc::new(rentals), shared.clock));
    HttpState::new(
        IdentityPorts {
            registration: identity.clone(),
            login: identity.clone(),
            verifier: identity.clone(),
            profile: identity.clone(),
            profile_command: identity,
        },
        MarketplacePorts {
            listings: listings.clone(),
            listings_query: listings,
            rentals: rentals.clone(),
            rentals_query: rentals,
        },
    )
}

/// Build handler state on Diesel repositories when a pool is configured,
/// otherwise on in-memory repositories.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    let shared = Collaborators {
        hasher: Arc::new(Argon2CredentialHasher::new()),
        assertions: config.assertions.clone(),
        avatars: config.avatars.clone(),
        clock: Arc::new(DefaultClock),
    };
    match &config.db_pool {
        Some(pool) => wire(
            DieselUserRepository::new(pool.clone()),
            DieselItemRepository::new(pool.clone()),
            DieselRentalRepository::new(pool.clone()),
            shared,
        ),
        None => wire(
            InMemoryUserRepository::new(),
            InMemoryItemRepository::new(),
            InMemoryRentalRepository::new(),
            shared,
        ),
    }
}
