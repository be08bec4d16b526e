//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/v1` endpoint, the health checks, the
//! request/response DTOs, and the error schema wrappers from
//! [`crate::inbound::http::schemas`]. Gated endpoints inherit the global
//! `BearerAuth` requirement; registration, login, and health checks opt out.
//!
//! The document is served by Swagger UI in debug builds and printed by the
//! `openapi-dump` binary.

use crate::inbound::http::health::{HealthBody, StorageBackend};
use crate::inbound::http::items::{CreateItemRequest, ItemResponse, UpdateItemRequest};
use crate::inbound::http::rentals::{CreateRentalRequest, RentalResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{
    LoginRequest, RegisterRequest, SessionResponse, UpdateProfileRequest, UserResponse,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the bearer-token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Identity assertion returned by POST /api/v1/register or /api/v1/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "RentEase backend API",
        description = "Peer-to-peer rental marketplace: accounts, listings, and rental requests."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::users::upload_avatar,
        crate::inbound::http::items::list_items,
        crate::inbound::http::items::create_item,
        crate::inbound::http::items::update_item,
        crate::inbound::http::items::delete_item,
        crate::inbound::http::rentals::list_rentals,
        crate::inbound::http::rentals::create_rental,
        crate::inbound::http::rentals::cancel_rental,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        RegisterRequest,
        LoginRequest,
        UpdateProfileRequest,
        UserResponse,
        SessionResponse,
        CreateItemRequest,
        UpdateItemRequest,
        ItemResponse,
        CreateRentalRequest,
        RentalResponse,
        HealthBody,
        StorageBackend,
    )),
    tags(
        (name = "users", description = "Registration, login, and the caller's profile"),
        (name = "items", description = "Listings owned by the caller"),
        (name = "rentals", description = "Rental requests placed by the caller"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
