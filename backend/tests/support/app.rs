//! In-process RentEase app for HTTP scenario tests.
//!
//! Uses the in-memory repositories with the real Argon2 hasher (cheap
//! parameters), JWT assertions, and a temporary avatar directory.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use argon2::Params;
use chrono::TimeDelta;
use mockable::DefaultClock;
use rentease::Trace;
use rentease::domain::{IdentityService, ListingService, RentalService};
use rentease::inbound::http::api_routes;
use rentease::inbound::http::state::{HttpState, IdentityPorts, MarketplacePorts};
use rentease::inbound::http::validation::json_config;
use rentease::outbound::avatar::FilesystemAvatarStore;
use rentease::outbound::credentials::{Argon2CredentialHasher, JwtIdentityAssertions};
use rentease::outbound::memory::{
    InMemoryItemRepository, InMemoryRentalRepository, InMemoryUserRepository,
};
use serde_json::Value;
use tempfile::TempDir;

pub const TOKEN_SECRET: &[u8] = b"integration-test-secret-0123456789abcdef";

/// Handler state plus the directory backing avatar uploads.
pub struct TestWorld {
    pub state: HttpState,
    pub uploads: TempDir,
}

pub fn world() -> TestWorld {
    let uploads = tempfile::tempdir().expect("temp upload dir");
    let avatars =
        FilesystemAvatarStore::open(uploads.path(), "/uploads").expect("open upload dir");
    let clock = Arc::new(DefaultClock);
    let hasher = Argon2CredentialHasher::with_params(
        Params::new(1024, 1, 1, None).expect("argon2 params"),
    );
    let identity = Arc::new(IdentityService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(hasher),
        Arc::new(JwtIdentityAssertions::new(TOKEN_SECRET, TimeDelta::hours(1))),
        Arc::new(avatars),
        clock.clone(),
    ));
    let listings = Arc::new(ListingService::new(
        Arc::new(InMemoryItemRepository::new()),
        clock.clone(),
    ));
    let rentals = Arc::new(RentalService::new(
        Arc::new(InMemoryRentalRepository::new()),
        clock,
    ));
    let state = HttpState::new(
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
    );
    TestWorld { state, uploads }
}

pub async fn init_app(
    state: HttpState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .app_data(json_config())
                    .configure(api_routes),
            ),
    )
    .await
}

/// Send `request`, optionally as `token`, and decode the JSON body.
pub async fn send<S>(app: &S, request: TestRequest, token: Option<&str>) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let request = match token {
        Some(token) => request.insert_header((AUTHORIZATION, format!("Bearer {token}"))),
        None => request,
    };
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let body = test::read_body(response).await;
    if body.is_empty() {
        return (status, Value::Null);
    }
    (status, serde_json::from_slice(&body).expect("JSON body"))
}
