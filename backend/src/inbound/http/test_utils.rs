//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::{AUTHORIZATION, HeaderName};
use actix_web::{App, test as actix_test, web};
use serde_json::Value;

use crate::domain::ports::{
    MockIdentityVerifier, MockListingCommand, MockListingQuery, MockLoginService,
    MockRegistrationService, MockRentalCommand, MockRentalQuery, MockUserProfileCommand,
    MockUserProfileQuery,
};
use crate::inbound::http::state::{HttpState, IdentityPorts, MarketplacePorts};
use crate::inbound::http::validation::json_config;

/// Mock for every port the handlers depend on.
///
/// Set expectations on the fields, then call [`TestPorts::into_state`].
#[derive(Default)]
pub struct TestPorts {
    pub registration: MockRegistrationService,
    pub login: MockLoginService,
    pub verifier: MockIdentityVerifier,
    pub profile: MockUserProfileQuery,
    pub profile_command: MockUserProfileCommand,
    pub listings: MockListingCommand,
    pub listings_query: MockListingQuery,
    pub rentals: MockRentalCommand,
    pub rentals_query: MockRentalQuery,
}

impl TestPorts {
    pub fn into_state(self) -> HttpState {
        HttpState::new(
            IdentityPorts {
                registration: Arc::new(self.registration),
                login: Arc::new(self.login),
                verifier: Arc::new(self.verifier),
                profile: Arc::new(self.profile),
                profile_command: Arc::new(self.profile_command),
            },
            MarketplacePorts {
                listings: Arc::new(self.listings),
                listings_query: Arc::new(self.listings_query),
                rentals: Arc::new(self.rentals),
                rentals_query: Arc::new(self.rentals_query),
            },
        )
    }
}

/// `Authorization` header carrying `token` as a bearer credential.
pub fn bearer(token: &str) -> (HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

/// Serve `request` from an app mounting `configure` under `/api/v1`.
///
/// Returns the status and the JSON body, or `Value::Null` for empty bodies.
pub async fn call_api(
    ports: TestPorts,
    configure: fn(&mut web::ServiceConfig),
    request: actix_test::TestRequest,
) -> (StatusCode, Value) {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(ports.into_state()))
            .app_data(json_config())
            .service(web::scope("/api/v1").configure(configure)),
    )
    .await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    if body.is_empty() {
        return (status, Value::Null);
    }
    let value = serde_json::from_slice(&body).expect("response body is JSON");
    (status, value)
}
