//! HTTP inbound adapter exposing the RentEase REST API.

use actix_web::web;

pub mod access_gate;
pub mod cache_control;
pub mod error;
pub mod health;
pub mod items;
pub mod rentals;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod token_config;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register every `/api/v1` endpoint on `cfg`.
///
/// Handlers read [`state::HttpState`] from app data; mount
/// [`validation::json_config`] alongside so malformed bodies are reported as
/// `invalid_request`.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(users::register)
        .service(users::login)
        .service(users::current_user)
        .service(users::update_profile)
        .service(users::upload_avatar)
        .service(items::list_items)
        .service(items::create_item)
        .service(items::update_item)
        .service(items::delete_item)
        .service(rentals::list_rentals)
        .service(rentals::create_rental)
        .service(rentals::cancel_rental);
}
