//! Rental Ledger model.
//!
//! A rental references a catalogue entry by a bare positive number and copies
//! the display fields it was requested with. The reference is never resolved
//! against listings, so later listing edits cannot reach existing rentals.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, OwnedResource, Price, PriceValidationError, UserId};

/// Maximum length of a snapshot text field in characters.
pub const SNAPSHOT_TEXT_MAX: usize = 2048;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RentalValidationError {
    #[error("{field} must not be empty")]
    Blank { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("itemId must be a positive integer")]
    InvalidItemRef,
    #[error(transparent)]
    Price(#[from] PriceValidationError),
    #[error("rental id must be a valid UUID")]
    InvalidRentalId,
    #[error("status must be Pending, Accepted, or Rejected")]
    UnknownStatus { value: String },
}

impl RentalValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Blank { field } | Self::TooLong { field, .. } => field,
            Self::InvalidItemRef => "itemId",
            Self::Price(_) => "price",
            Self::InvalidRentalId => "id",
            Self::UnknownStatus { .. } => "status",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Blank { .. } => "missing_field",
            Self::TooLong { .. } => "too_long",
            Self::InvalidItemRef => "invalid_item_id",
            Self::Price(_) => "invalid_price",
            Self::InvalidRentalId => "invalid_uuid",
            Self::UnknownStatus { .. } => "invalid_status",
        }
    }
}

impl From<RentalValidationError> for Error {
    fn from(value: RentalValidationError) -> Self {
        Error::invalid_request(value.to_string()).with_details(json!({
            "field": value.field(),
            "code": value.code(),
        }))
    }
}

/// Rental identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RentalId(Uuid);

impl RentalId {
    pub fn new(raw: &str) -> Result<Self, RentalValidationError> {
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| RentalValidationError::InvalidRentalId)
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

impl fmt::Display for RentalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Positive catalogue reference carried by a rental request.
///
/// # Examples
/// ```
/// use rentease::domain::CatalogueItemRef;
///
/// assert_eq!(CatalogueItemRef::new(3).expect("positive").get(), 3);
/// assert_eq!(CatalogueItemRef::parse(" 42 ").expect("numeric string").get(), 42);
/// assert!(CatalogueItemRef::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CatalogueItemRef(i64);

impl CatalogueItemRef {
    pub fn new(value: i64) -> Result<Self, RentalValidationError> {
        if value <= 0 {
            return Err(RentalValidationError::InvalidItemRef);
        }
        Ok(Self(value))
    }

    /// Accept the decimal string form, as browsers often submit numbers.
    pub fn parse(raw: &str) -> Result<Self, RentalValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RentalValidationError::Blank { field: "itemId" });
        }
        let value = trimmed
            .parse::<i64>()
            .map_err(|_| RentalValidationError::InvalidItemRef)?;
        Self::new(value)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for CatalogueItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot text copied verbatim from the request.
///
/// Must not be blank; surrounding whitespace is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotText(String);

impl SnapshotText {
    pub fn new(raw: impl Into<String>, field: &'static str) -> Result<Self, RentalValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(RentalValidationError::Blank { field });
        }
        if raw.chars().count() > SNAPSHOT_TEXT_MAX {
            return Err(RentalValidationError::TooLong {
                field,
                max: SNAPSHOT_TEXT_MAX,
            });
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for SnapshotText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Rental request status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RentalStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl RentalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
        }
    }
}

impl FromStr for RentalStatus {
    type Err = RentalValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Accepted" => Ok(Self::Accepted),
            "Rejected" => Ok(Self::Rejected),
            other => Err(RentalValidationError::UnknownStatus {
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display fields copied at request time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentalSnapshot {
    pub title: SnapshotText,
    pub price: Price,
    pub image: SnapshotText,
    pub location: SnapshotText,
    pub description: Option<SnapshotText>,
}

/// Raw components used to rehydrate a [`Rental`] from storage.
#[derive(Debug, Clone)]
pub struct RentalDraft {
    pub id: RentalId,
    pub requester: UserId,
    pub item_ref: CatalogueItemRef,
    pub snapshot: RentalSnapshot,
    pub status: RentalStatus,
    pub created_at: DateTime<Utc>,
}

/// A rental request placed by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rental {
    id: RentalId,
    requester: UserId,
    item_ref: CatalogueItemRef,
    snapshot: RentalSnapshot,
    status: RentalStatus,
    created_at: DateTime<Utc>,
}

impl Rental {
    /// Open a new request. Status always starts as [`RentalStatus::Pending`].
    pub fn request(
        id: RentalId,
        requester: UserId,
        item_ref: CatalogueItemRef,
        snapshot: RentalSnapshot,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            requester,
            item_ref,
            snapshot,
            status: RentalStatus::Pending,
            created_at: now,
        }
    }

    pub fn id(&self) -> &RentalId {
        &self.id
    }

    pub fn requester(&self) -> &UserId {
        &self.requester
    }

    pub fn item_ref(&self) -> CatalogueItemRef {
        self.item_ref
    }

    pub fn snapshot(&self) -> &RentalSnapshot {
        &self.snapshot
    }

    pub fn status(&self) -> RentalStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl From<RentalDraft> for Rental {
    fn from(draft: RentalDraft) -> Self {
        Self {
            id: draft.id,
            requester: draft.requester,
            item_ref: draft.item_ref,
            snapshot: draft.snapshot,
            status: draft.status,
            created_at: draft.created_at,
        }
    }
}

impl OwnedResource for Rental {
    fn owner(&self) -> &UserId {
        &self.requester
    }
}
