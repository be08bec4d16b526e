//! Authentication primitives: credentials, password policy, and identities.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::json;
use zeroize::Zeroizing;

use crate::domain::{EmailAddress, Error, User, UserId, UserName, UserValidationError, normalise_email};

/// Minimum password length accepted at registration.
pub const PASSWORD_MIN: usize = 8;
/// Maximum password length accepted at registration.
pub const PASSWORD_MAX: usize = 128;

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
    /// Password is shorter than [`PASSWORD_MIN`].
    PasswordTooShort { min: usize },
    /// Password is longer than [`PASSWORD_MAX`].
    PasswordTooLong { max: usize },
    /// Password must mix at least one letter and one digit.
    PasswordTooWeak,
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::PasswordTooLong { max } => {
                write!(f, "password must be at most {max} characters")
            }
            Self::PasswordTooWeak => {
                write!(f, "password must contain at least one letter and one digit")
            }
        }
    }
}

impl std::error::Error for CredentialValidationError {}

impl From<CredentialValidationError> for Error {
    fn from(value: CredentialValidationError) -> Self {
        let (field, code) = match value {
            CredentialValidationError::EmptyEmail => ("email", "missing_field"),
            CredentialValidationError::EmptyPassword => ("password", "missing_field"),
            CredentialValidationError::PasswordTooShort { .. } => ("password", "too_short"),
            CredentialValidationError::PasswordTooLong { .. } => ("password", "too_long"),
            CredentialValidationError::PasswordTooWeak => ("password", "weak_password"),
        };
        Error::invalid_request(value.to_string()).with_details(json!({
            "field": field,
            "code": code,
        }))
    }
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is trimmed and lowercased but not shape-checked, so a malformed
///   address fails authentication exactly like an unknown one.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use rentease::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Alice@Example.com", "s3cret-pw").unwrap();
/// assert_eq!(creds.email(), "alice@example.com");
/// assert_eq!(creds.password(), "s3cret-pw");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialValidationError> {
        let normalised = normalise_email(email);
        if normalised.is_empty() {
            return Err(CredentialValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        Ok(Self {
            email: normalised,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email suitable for user lookups.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A password that satisfies the registration policy.
#[derive(Clone, PartialEq, Eq)]
pub struct NewPassword(Zeroizing<String>);

impl NewPassword {
    /// Enforce length bounds and require both a letter and a digit.
    pub fn new(raw: &str) -> Result<Self, CredentialValidationError> {
        if raw.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        let length = raw.chars().count();
        if length < PASSWORD_MIN {
            return Err(CredentialValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if length > PASSWORD_MAX {
            return Err(CredentialValidationError::PasswordTooLong { max: PASSWORD_MAX });
        }
        let has_letter = raw.chars().any(char::is_alphabetic);
        let has_digit = raw.chars().any(|c| c.is_ascii_digit());
        if !(has_letter && has_digit) {
            return Err(CredentialValidationError::PasswordTooWeak);
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NewPassword(<redacted>)")
    }
}

/// Validation failures for a registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    User(UserValidationError),
    Credential(CredentialValidationError),
}

impl From<UserValidationError> for RegistrationValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::User(value)
    }
}

impl From<CredentialValidationError> for RegistrationValidationError {
    fn from(value: CredentialValidationError) -> Self {
        Self::Credential(value)
    }
}

impl From<RegistrationValidationError> for Error {
    fn from(value: RegistrationValidationError) -> Self {
        match value {
            RegistrationValidationError::User(err) => err.into(),
            RegistrationValidationError::Credential(err) => err.into(),
        }
    }
}

/// Validated registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    name: UserName,
    email: EmailAddress,
    password: NewPassword,
}

impl RegistrationRequest {
    /// Validate name, email, and password in that order.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, RegistrationValidationError> {
        Ok(Self {
            name: UserName::new(name)?,
            email: EmailAddress::new(email)?,
            password: NewPassword::new(password)?,
        })
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &NewPassword {
        &self.password
    }
}

/// Opaque PHC-formatted credential hash. Never serialised.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// A user record together with its stored credential hash.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    pub user: User,
    pub password_hash: PasswordHash,
}

/// Caller identity proven by a verified assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    user_id: UserId,
    email: String,
}

impl Identity {
    pub fn new(user_id: UserId, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self::new(*user.id(), user.email().as_ref())
    }
}

/// Bearer assertion issued to an authenticated user.
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedAssertion {
    token: Zeroizing<String>,
    expires_at: DateTime<Utc>,
}

impl IssuedAssertion {
    pub fn new(token: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: Zeroizing::new(token),
            expires_at,
        }
    }

    pub fn token(&self) -> &str {
        self.token.as_str()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

impl fmt::Debug for IssuedAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedAssertion")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Outcome of a successful registration or login.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub user: User,
    pub assertion: IssuedAssertion,
}
