//! Rental Ledger HTTP handlers.
//!
//! ```text
//! GET /api/v1/rentals
//! POST /api/v1/rentals {"itemId":42,"title":"Drill","price":300,"image":"https://img.example.com/d.png","location":"delhi"}
//! DELETE /api/v1/rentals/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    CatalogueItemRef, Error, Rental, RentalId, RentalSnapshot, RentalValidationError,
    SnapshotText,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::access_gate::Authenticated;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, NumericInput, parse_item_ref, parse_price, require,
};

/// Rental request body for `POST /api/v1/rentals`.
///
/// `itemId` is a catalogue number and is not checked against listings.
/// Display fields are stored exactly as sent.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRentalRequest {
    #[schema(value_type = Option<i64>, example = 42)]
    pub item_id: Option<NumericInput>,
    #[schema(example = "Drill")]
    pub title: Option<String>,
    #[schema(value_type = Option<f64>, example = 300)]
    pub price: Option<NumericInput>,
    #[schema(example = "https://img.example.com/d.png")]
    pub image: Option<String>,
    #[schema(example = "delhi")]
    pub location: Option<String>,
    pub description: Option<String>,
}

impl CreateRentalRequest {
    fn into_parts(self) -> Result<(CatalogueItemRef, RentalSnapshot), Error> {
        let item_id = require(self.item_id, FieldName::new("itemId"))?;
        let title = require(self.title, FieldName::new("title"))?;
        let price = require(self.price, FieldName::new("price"))?;
        let image = require(self.image, FieldName::new("image"))?;
        let location = require(self.location, FieldName::new("location"))?;
        let item_ref = parse_item_ref(&item_id)?;
        let snapshot = RentalSnapshot {
            title: SnapshotText::new(title, "title")?,
            price: parse_price(&price).map_err(RentalValidationError::from)?,
            image: SnapshotText::new(image, "image")?,
            location: SnapshotText::new(location, "location")?,
            description: self
                .description
                .filter(|text| !text.trim().is_empty())
                .map(|text| SnapshotText::new(text, "description"))
                .transpose()?,
        };
        Ok((item_ref, snapshot))
    }
}

/// Rental as returned to its requester.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RentalResponse {
    pub id: String,
    pub requester: String,
    #[schema(example = 42)]
    pub item_id: i64,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 300.0)]
    pub price: Decimal,
    pub image: String,
    pub location: String,
    pub description: Option<String>,
    #[schema(example = "Pending")]
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Rental> for RentalResponse {
    fn from(rental: &Rental) -> Self {
        let snapshot = rental.snapshot();
        Self {
            id: rental.id().to_string(),
            requester: rental.requester().to_string(),
            item_id: rental.item_ref().get(),
            title: snapshot.title.as_ref().to_owned(),
            price: snapshot.price.amount(),
            image: snapshot.image.as_ref().to_owned(),
            location: snapshot.location.as_ref().to_owned(),
            description: snapshot
                .description
                .as_ref()
                .map(|text| text.as_ref().to_owned()),
            status: rental.status().as_str().to_owned(),
            created_at: rental.created_at(),
        }
    }
}

/// List rentals the caller requested, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/rentals",
    responses(
        (status = 200, description = "Caller's rentals", body = [RentalResponse]),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["rentals"],
    operation_id = "listRentals"
)]
#[get("/rentals")]
pub async fn list_rentals(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    let rentals = state.rentals_query.list_rentals(caller.user_id()).await?;
    let body: Vec<RentalResponse> = rentals.iter().map(RentalResponse::from).collect();
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(body))
}

/// Request a rental. The new rental is always `Pending`.
#[utoipa::path(
    post,
    path = "/api/v1/rentals",
    request_body = CreateRentalRequest,
    responses(
        (status = 201, description = "Rental requested", body = RentalResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema)
    ),
    tags = ["rentals"],
    operation_id = "createRental"
)]
#[post("/rentals")]
pub async fn create_rental(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<CreateRentalRequest>,
) -> ApiResult<HttpResponse> {
    let (item_ref, snapshot) = payload.into_inner().into_parts()?;
    let rental = state
        .rentals
        .create_rental(caller.user_id(), item_ref, snapshot)
        .await?;
    Ok(HttpResponse::Created().json(RentalResponse::from(&rental)))
}

/// Cancel one of the caller's rentals.
#[utoipa::path(
    delete,
    path = "/api/v1/rentals/{id}",
    params(("id" = String, Path, description = "Rental identifier")),
    responses(
        (status = 204, description = "Rental cancelled"),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema),
        (status = 404, description = "No such rental requested by the caller", body = ErrorSchema)
    ),
    tags = ["rentals"],
    operation_id = "cancelRental"
)]
#[delete("/rentals/{id}")]
pub async fn cancel_rental(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = RentalId::new(&path.into_inner())?;
    state.rentals.cancel_rental(caller.user_id(), &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "rentals_tests.rs"]
mod tests;
