//! User data model.
//!
//! Users are created on registration, mutated only through profile updates,
//! and never deleted. Credential hashes are deliberately absent from
//! [`User`]; see [`crate::domain::StoredCredentials`].

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

/// Maximum length of a user name in characters.
pub const USER_NAME_MAX: usize = 64;
/// Maximum length of an email address in characters.
pub const EMAIL_MAX: usize = 254;
/// Maximum length of a phone number in characters.
pub const PHONE_MAX: usize = 32;
/// Maximum length of a postal address in characters.
pub const ADDRESS_MAX: usize = 256;
/// Maximum length of an avatar reference in characters.
pub const AVATAR_MAX: usize = 2048;

/// Validation errors raised by the user primitives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must not be empty")]
    EmptyId,
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("name must not be empty")]
    EmptyName,
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email must look like name@domain.tld")]
    InvalidEmail,
    #[error("{field} must be at most {max} characters")]
    FieldTooLong { field: &'static str, max: usize },
}

impl UserValidationError {
    /// Request field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyId | Self::InvalidId => "id",
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::EmptyEmail | Self::InvalidEmail => "email",
            Self::FieldTooLong { field, .. } => field,
        }
    }

    /// Machine-readable validation code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyId | Self::EmptyName | Self::EmptyEmail => "missing_field",
            Self::InvalidId => "invalid_uuid",
            Self::NameTooLong { .. } | Self::FieldTooLong { .. } => "too_long",
            Self::InvalidEmail => "invalid_email",
        }
    }
}

impl From<UserValidationError> for Error {
    fn from(value: UserValidationError) -> Self {
        Error::invalid_request(value.to_string()).with_details(json!({
            "field": value.field(),
            "code": value.code(),
        }))
    }
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from its string form.
    ///
    /// # Examples
    /// ```
    /// use rentease::domain::UserId;
    ///
    /// let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
    /// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    /// assert!(UserId::new("not-a-uuid").is_err());
    /// ```
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let id = id.as_ref();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unique public user name.
///
/// ## Invariants
/// - Stored trimmed, between 1 and [`USER_NAME_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a [`UserName`].
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if trimmed.chars().count() > USER_NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                max: USER_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Unique email address, normalised to lowercase.
///
/// # Examples
/// ```
/// use rentease::domain::EmailAddress;
///
/// let email = EmailAddress::new("  Alice@Example.COM ").expect("valid email");
/// assert_eq!(email.as_ref(), "alice@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate, trim, and lowercase an email address.
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = normalise_email(email.as_ref());
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if normalised.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::FieldTooLong {
                field: "email",
                max: EMAIL_MAX,
            });
        }
        if !email_regex().is_match(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

/// Canonical lookup form of an email: trimmed and lowercased.
pub fn normalise_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw components used to build or rehydrate a [`User`].
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub id: UserId,
    pub name: UserName,
    pub email: EmailAddress,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Application user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: UserName,
    email: EmailAddress,
    phone: Option<String>,
    address: Option<String>,
    avatar: Option<String>,
    created_at: DateTime<Utc>,
}

impl User {
    /// Build a user with no optional profile fields.
    pub fn register(id: UserId, name: UserName, email: EmailAddress, now: DateTime<Utc>) -> Self {
        Self::from(UserDraft {
            id,
            name,
            email,
            phone: None,
            address: None,
            avatar: None,
            created_at: now,
        })
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Avatar reference: an absolute URL or a path served by the upload store.
    pub fn avatar(&self) -> Option<&str> {
        self.avatar.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Return a copy with the profile update applied.
    ///
    /// Identity fields (`id`, `name`, `email`) are never touched.
    pub fn with_profile(&self, update: &ProfileUpdate) -> Self {
        let mut next = self.clone();
        update.phone.apply_to(&mut next.phone);
        update.address.apply_to(&mut next.address);
        update.avatar.apply_to(&mut next.avatar);
        next
    }
}

impl From<UserDraft> for User {
    fn from(draft: UserDraft) -> Self {
        let UserDraft {
            id,
            name,
            email,
            phone,
            address,
            avatar,
            created_at,
        } = draft;
        Self {
            id,
            name,
            email,
            phone: phone.filter(|value| !value.is_empty()),
            address: address.filter(|value| !value.is_empty()),
            avatar: avatar.filter(|value| !value.is_empty()),
            created_at,
        }
    }
}

/// Change requested for a single optional profile field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate {
    /// Leave the stored value as it is.
    #[default]
    Unchanged,
    /// Remove the stored value.
    Clear,
    /// Replace the stored value.
    Set(String),
}

impl FieldUpdate {
    fn parse(
        value: Option<String>,
        field: &'static str,
        max: usize,
    ) -> Result<Self, UserValidationError> {
        let Some(raw) = value else {
            return Ok(Self::Unchanged);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::Clear);
        }
        if trimmed.chars().count() > max {
            return Err(UserValidationError::FieldTooLong { field, max });
        }
        Ok(Self::Set(trimmed.to_owned()))
    }

    fn apply_to(&self, slot: &mut Option<String>) {
        match self {
            Self::Unchanged => {}
            Self::Clear => *slot = None,
            Self::Set(value) => *slot = Some(value.clone()),
        }
    }
}

/// Safelisted profile changes: phone, address, and avatar reference.
///
/// Absent inputs leave fields unchanged; blank strings clear them.
///
/// # Examples
/// ```
/// use rentease::domain::{FieldUpdate, ProfileUpdate};
///
/// let update = ProfileUpdate::try_new(Some("555-0100".into()), Some(String::new()), None)
///     .expect("valid update");
/// assert_eq!(update.phone(), &FieldUpdate::Set("555-0100".into()));
/// assert_eq!(update.address(), &FieldUpdate::Clear);
/// assert_eq!(update.avatar(), &FieldUpdate::Unchanged);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    phone: FieldUpdate,
    address: FieldUpdate,
    avatar: FieldUpdate,
}

impl ProfileUpdate {
    pub fn try_new(
        phone: Option<String>,
        address: Option<String>,
        avatar: Option<String>,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            phone: FieldUpdate::parse(phone, "phone", PHONE_MAX)?,
            address: FieldUpdate::parse(address, "address", ADDRESS_MAX)?,
            avatar: FieldUpdate::parse(avatar, "avatarUrl", AVATAR_MAX)?,
        })
    }

    /// Update that only replaces the avatar reference.
    pub fn avatar_only(reference: impl Into<String>) -> Self {
        Self {
            avatar: FieldUpdate::Set(reference.into()),
            ..Self::default()
        }
    }

    pub fn phone(&self) -> &FieldUpdate {
        &self.phone
    }

    pub fn address(&self) -> &FieldUpdate {
        &self.address
    }

    pub fn avatar(&self) -> &FieldUpdate {
        &self.avatar
    }

    /// True when no field would change.
    pub fn is_noop(&self) -> bool {
        [&self.phone, &self.address, &self.avatar]
            .iter()
            .all(|field| matches!(field, FieldUpdate::Unchanged))
    }
}
