//! Listing Store HTTP handlers.
//!
//! ```text
//! GET /api/v1/items
//! POST /api/v1/items {"title":"Drill","description":"18V","price":300,"location":"delhi","category":"tools","imageUrl":"https://img.example.com/d.png"}
//! PUT /api/v1/items/{id} {"price":"275.50"}
//! DELETE /api/v1/items/{id}
//! ```

use std::str::FromStr;

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Category, Description, ImageUrl, Item, ItemDetails, ItemId, ItemPatch,
    ListingValidationError, Location, OwnedResource, Price, Title,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::access_gate::Authenticated;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, NumericInput, parse_price, require};

/// Listing body for `POST /api/v1/items`.
///
/// Any owner supplied by the client is ignored; unknown keys are skipped.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    #[schema(example = "Cordless drill")]
    pub title: Option<String>,
    #[schema(example = "18V with two batteries")]
    pub description: Option<String>,
    #[schema(value_type = Option<f64>, example = 300)]
    pub price: Option<NumericInput>,
    #[schema(example = "delhi")]
    pub location: Option<String>,
    #[schema(example = "tools")]
    pub category: Option<String>,
    #[schema(example = "https://img.example.com/drill.png")]
    pub image_url: Option<String>,
}

/// Partial listing update for `PUT /api/v1/items/{id}`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub price: Option<NumericInput>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

/// Listing as returned to its owner.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    #[schema(example = "9b2f4c1e-8d0a-4f6b-b0f1-3c5a7e9d2b41")]
    pub id: String,
    pub owner: String,
    pub title: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 300.0)]
    pub price: Decimal,
    pub location: String,
    #[schema(example = "tools")]
    pub category: String,
    pub image_url: String,
    #[schema(example = "available")]
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Item> for ItemResponse {
    fn from(item: &Item) -> Self {
        let details = item.details();
        Self {
            id: item.id().to_string(),
            owner: item.owner().to_string(),
            title: details.title.to_string(),
            description: details.description.to_string(),
            price: details.price.amount(),
            location: details.location.to_string(),
            category: details.category.as_str().to_owned(),
            image_url: details.image.as_str().to_owned(),
            status: item.status().as_str().to_owned(),
            created_at: item.created_at(),
        }
    }
}

fn price_field(value: &NumericInput) -> Result<Price, ListingValidationError> {
    parse_price(value).map_err(ListingValidationError::from)
}

impl TryFrom<CreateItemRequest> for ItemDetails {
    type Error = crate::domain::Error;

    fn try_from(request: CreateItemRequest) -> Result<Self, Self::Error> {
        let title = require(request.title, FieldName::new("title"))?;
        let description = require(request.description, FieldName::new("description"))?;
        let price = require(request.price, FieldName::new("price"))?;
        let location = require(request.location, FieldName::new("location"))?;
        let category = require(request.category, FieldName::new("category"))?;
        let image = require(request.image_url, FieldName::new("imageUrl"))?;
        Ok(Self {
            title: Title::new(title)?,
            description: Description::new(description)?,
            price: price_field(&price)?,
            location: Location::new(location)?,
            category: Category::from_str(&category)?,
            image: ImageUrl::new(image)?,
        })
    }
}

impl TryFrom<UpdateItemRequest> for ItemPatch {
    type Error = ListingValidationError;

    fn try_from(request: UpdateItemRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: request.title.map(Title::new).transpose()?,
            description: request.description.map(Description::new).transpose()?,
            price: request.price.as_ref().map(price_field).transpose()?,
            location: request.location.map(Location::new).transpose()?,
            category: request
                .category
                .as_deref()
                .map(Category::from_str)
                .transpose()?,
            image: request.image_url.map(ImageUrl::new).transpose()?,
        })
    }
}

/// List the caller's items, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/items",
    responses(
        (status = 200, description = "Caller's listings", body = [ItemResponse]),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "listItems"
)]
#[get("/items")]
pub async fn list_items(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    let items = state.listings_query.list_items(caller.user_id()).await?;
    let body: Vec<ItemResponse> = items.iter().map(ItemResponse::from).collect();
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(body))
}

/// List a new item owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Listing created", body = ItemResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "createItem"
)]
#[post("/items")]
pub async fn create_item(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<CreateItemRequest>,
) -> ApiResult<HttpResponse> {
    let details = ItemDetails::try_from(payload.into_inner())?;
    let item = state.listings.create_item(caller.user_id(), details).await?;
    Ok(HttpResponse::Created().json(ItemResponse::from(&item)))
}

/// Change some fields of one of the caller's items.
#[utoipa::path(
    put,
    path = "/api/v1/items/{id}",
    params(("id" = String, Path, description = "Item identifier")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Updated listing", body = ItemResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema),
        (status = 404, description = "No such item owned by the caller", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "updateItem"
)]
#[put("/items/{id}")]
pub async fn update_item(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
    payload: web::Json<UpdateItemRequest>,
) -> ApiResult<web::Json<ItemResponse>> {
    let id = ItemId::new(&path.into_inner())?;
    let patch = ItemPatch::try_from(payload.into_inner())?;
    let item = state
        .listings
        .update_item(caller.user_id(), &id, patch)
        .await?;
    Ok(web::Json(ItemResponse::from(&item)))
}

/// Remove one of the caller's items.
#[utoipa::path(
    delete,
    path = "/api/v1/items/{id}",
    params(("id" = String, Path, description = "Item identifier")),
    responses(
        (status = 204, description = "Listing removed"),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 401, description = "Missing bearer token", body = ErrorSchema),
        (status = 403, description = "Invalid or expired token", body = ErrorSchema),
        (status = 404, description = "No such item owned by the caller", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "deleteItem"
)]
#[delete("/items/{id}")]
pub async fn delete_item(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = ItemId::new(&path.into_inner())?;
    state.listings.delete_item(caller.user_id(), &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "items_tests.rs"]
mod tests;
