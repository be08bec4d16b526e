//! Listing Store model: items a user offers for rent.
//!
//! An item's owner is fixed at creation and only the owner may change or
//! delete it. Status is stored but no operation transitions it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;
use uuid::Uuid;

use crate::domain::{Error, OwnedResource, Price, PriceValidationError, UserId};

/// Maximum title length in characters.
pub const TITLE_MAX: usize = 120;
/// Maximum description length in characters.
pub const DESCRIPTION_MAX: usize = 2000;
/// Maximum location length in characters.
pub const LOCATION_MAX: usize = 120;
/// Maximum image URL length in characters.
pub const IMAGE_URL_MAX: usize = 2048;

/// Validation errors raised while building listing values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingValidationError {
    #[error("{field} must not be empty")]
    Blank { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error(transparent)]
    Price(#[from] PriceValidationError),
    #[error("category must be one of: electronics, vehicles, furniture, tools, sports, other")]
    UnknownCategory { value: String },
    #[error("imageUrl must be an absolute http(s) URL")]
    InvalidImageUrl,
    #[error("item id must be a valid UUID")]
    InvalidItemId,
    #[error("status must be available or rented")]
    UnknownStatus { value: String },
}

impl ListingValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Blank { field } | Self::TooLong { field, .. } => field,
            Self::Price(_) => "price",
            Self::UnknownCategory { .. } => "category",
            Self::InvalidImageUrl => "imageUrl",
            Self::InvalidItemId => "id",
            Self::UnknownStatus { .. } => "status",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Blank { .. } => "missing_field",
            Self::TooLong { .. } => "too_long",
            Self::Price(_) => "invalid_price",
            Self::UnknownCategory { .. } => "invalid_category",
            Self::InvalidImageUrl => "invalid_url",
            Self::InvalidItemId => "invalid_uuid",
            Self::UnknownStatus { .. } => "invalid_status",
        }
    }
}

impl From<ListingValidationError> for Error {
    fn from(value: ListingValidationError) -> Self {
        Error::invalid_request(value.to_string()).with_details(json!({
            "field": value.field(),
            "code": value.code(),
        }))
    }
}

fn bounded_text(
    raw: &str,
    field: &'static str,
    max: usize,
) -> Result<String, ListingValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ListingValidationError::Blank { field });
    }
    if trimmed.chars().count() > max {
        return Err(ListingValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

/// Listing identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new(raw: &str) -> Result<Self, ListingValidationError> {
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| ListingValidationError::InvalidItemId)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! text_newtype {
    ($(#[$meta:meta])* $name:ident, $field:literal, $max:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(String);

        impl $name {
            /// Trim and validate the raw value.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, ListingValidationError> {
                bounded_text(raw.as_ref(), $field, $max).map(Self)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

text_newtype!(
    /// Listing headline.
    Title,
    "title",
    TITLE_MAX
);
text_newtype!(
    /// Free-form listing description.
    Description,
    "description",
    DESCRIPTION_MAX
);
text_newtype!(
    /// Free-text pickup location such as a city name.
    Location,
    "location",
    LOCATION_MAX
);

/// Enumerated listing categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Electronics,
    Vehicles,
    Furniture,
    Tools,
    Sports,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Self::Electronics,
        Self::Vehicles,
        Self::Furniture,
        Self::Tools,
        Self::Sports,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Electronics => "electronics",
            Self::Vehicles => "vehicles",
            Self::Furniture => "furniture",
            Self::Tools => "tools",
            Self::Sports => "sports",
            Self::Other => "other",
        }
    }
}

impl FromStr for Category {
    type Err = ListingValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        if wanted.is_empty() {
            return Err(ListingValidationError::Blank { field: "category" });
        }
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == wanted)
            .ok_or(ListingValidationError::UnknownCategory { value: wanted })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Absolute `http`/`https` image URL.
///
/// # Examples
/// ```
/// use rentease::domain::ImageUrl;
///
/// assert!(ImageUrl::new("https://cdn.example.com/drill.jpg").is_ok());
/// assert!(ImageUrl::new("drill.jpg").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrl(Url);

impl ImageUrl {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ListingValidationError> {
        let trimmed = bounded_text(raw.as_ref(), "imageUrl", IMAGE_URL_MAX)?;
        let url = Url::parse(&trimmed).map_err(|_| ListingValidationError::InvalidImageUrl)?;
        if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
            return Err(ListingValidationError::InvalidImageUrl);
        }
        // The serialised form is what gets stored and re-validated on read;
        // percent-encoding can make it much longer than the input.
        if url.as_str().len() > IMAGE_URL_MAX {
            return Err(ListingValidationError::TooLong {
                field: "imageUrl",
                max: IMAGE_URL_MAX,
            });
        }
        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ImageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Availability marker. Defaults to `available`; nothing transitions it yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Available,
    Rented,
}

impl ItemStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Rented => "rented",
        }
    }
}

impl FromStr for ItemStatus {
    type Err = ListingValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "rented" => Ok(Self::Rented),
            other => Err(ListingValidationError::UnknownStatus {
                value: other.to_owned(),
            }),
        }
    }
}

/// Complete, validated field set for a new listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDetails {
    pub title: Title,
    pub description: Description,
    pub price: Price,
    pub location: Location,
    pub category: Category,
    pub image: ImageUrl,
}

/// Partial listing update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub title: Option<Title>,
    pub description: Option<Description>,
    pub price: Option<Price>,
    pub location: Option<Location>,
    pub category: Option<Category>,
    pub image: Option<ImageUrl>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.location.is_none()
            && self.category.is_none()
            && self.image.is_none()
    }
}

/// Raw components used to rehydrate an [`Item`] from storage.
#[derive(Debug, Clone)]
pub struct ItemDraft {
    pub id: ItemId,
    pub owner: UserId,
    pub details: ItemDetails,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
}

/// A listing offered for rent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id: ItemId,
    owner: UserId,
    details: ItemDetails,
    status: ItemStatus,
    created_at: DateTime<Utc>,
}

impl Item {
    /// Create a fresh, available listing owned by `owner`.
    pub fn list(id: ItemId, owner: UserId, details: ItemDetails, now: DateTime<Utc>) -> Self {
        Self {
            id,
            owner,
            details,
            status: ItemStatus::Available,
            created_at: now,
        }
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn details(&self) -> &ItemDetails {
        &self.details
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Return a copy with the supplied fields replaced.
    ///
    /// `id`, `owner`, `status`, and `created_at` are carried over untouched.
    pub fn patched(&self, patch: &ItemPatch) -> Self {
        let mut details = self.details.clone();
        if let Some(title) = &patch.title {
            details.title = title.clone();
        }
        if let Some(description) = &patch.description {
            details.description = description.clone();
        }
        if let Some(price) = patch.price {
            details.price = price;
        }
        if let Some(location) = &patch.location {
            details.location = location.clone();
        }
        if let Some(category) = patch.category {
            details.category = category;
        }
        if let Some(image) = &patch.image {
            details.image = image.clone();
        }
        Self {
            details,
            ..self.clone()
        }
    }
}

impl From<ItemDraft> for Item {
    fn from(draft: ItemDraft) -> Self {
        Self {
            id: draft.id,
            owner: draft.owner,
            details: draft.details,
            status: draft.status,
            created_at: draft.created_at,
        }
    }
}

impl OwnedResource for Item {
    fn owner(&self) -> &UserId {
        &self.owner
    }
}

#[cfg(test)]
mod tests;
