//! Avatar upload payloads.

use std::fmt;

use serde_json::json;

use crate::domain::Error;

/// Largest accepted avatar body, in bytes.
pub const AVATAR_MAX_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AvatarValidationError {
    #[error("avatar content type must be image/png, image/jpeg, image/gif, or image/webp")]
    UnsupportedType { content_type: String },
    #[error("avatar body must not be empty")]
    Empty,
    #[error("avatar body must be at most {max} bytes")]
    TooLarge { max: usize },
    #[error("avatar body does not match its declared content type")]
    ContentMismatch,
}

impl AvatarValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedType { .. } => "unsupported_media_type",
            Self::Empty => "missing_field",
            Self::TooLarge { .. } => "too_large",
            Self::ContentMismatch => "content_mismatch",
        }
    }
}

impl From<AvatarValidationError> for Error {
    fn from(value: AvatarValidationError) -> Self {
        Error::invalid_request(value.to_string()).with_details(json!({
            "field": "avatar",
            "code": value.code(),
        }))
    }
}

/// Image formats accepted as avatars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AvatarFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl AvatarFormat {
    /// Resolve a `Content-Type` value, ignoring parameters.
    pub fn from_content_type(raw: &str) -> Option<Self> {
        let essence = raw.split(';').next().unwrap_or_default().trim().to_lowercase();
        match essence.as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/gif" => Some(Self::Gif),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }

    fn matches(self, bytes: &[u8]) -> bool {
        match self {
            Self::Png => bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
            Self::Jpeg => bytes.starts_with(&[0xFF, 0xD8, 0xFF]),
            Self::Gif => bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a"),
            Self::Webp => bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP",
        }
    }
}

impl fmt::Display for AvatarFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Validated avatar image: a supported format whose magic bytes agree with
/// the declared content type, no larger than [`AVATAR_MAX_BYTES`].
#[derive(Clone, PartialEq, Eq)]
pub struct AvatarImage {
    format: AvatarFormat,
    bytes: Vec<u8>,
}

impl AvatarImage {
    pub fn new(content_type: &str, bytes: Vec<u8>) -> Result<Self, AvatarValidationError> {
        let format = AvatarFormat::from_content_type(content_type).ok_or_else(|| {
            AvatarValidationError::UnsupportedType {
                content_type: content_type.to_owned(),
            }
        })?;
        if bytes.is_empty() {
            return Err(AvatarValidationError::Empty);
        }
        if bytes.len() > AVATAR_MAX_BYTES {
            return Err(AvatarValidationError::TooLarge {
                max: AVATAR_MAX_BYTES,
            });
        }
        if !format.matches(&bytes) {
            return Err(AvatarValidationError::ContentMismatch);
        }
        Ok(Self { format, bytes })
    }

    pub fn format(&self) -> AvatarFormat {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for AvatarImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvatarImage")
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}
