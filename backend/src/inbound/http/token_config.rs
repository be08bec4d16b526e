//! Identity assertion configuration parsing and validation.
//!
//! The token signing secret and lifetime are read once at boot from the
//! environment so they are validated consistently and can be tested in
//! isolation.

use std::path::PathBuf;

use argon2::password_hash::rand_core::{OsRng, RngCore};
use chrono::TimeDelta;
use mockable::Env;
use tracing::warn;
use zeroize::Zeroizing;

pub mod fingerprint;

const TOKEN_SECRET_DEFAULT_PATH: &str = "/var/run/secrets/token_secret";
/// Minimum secret length accepted in release builds.
pub const TOKEN_SECRET_MIN_LEN: usize = 32;
/// Lifetime applied when `TOKEN_TTL_SECONDS` is unset.
pub const TOKEN_TTL_DEFAULT_SECONDS: i64 = 3600;
const SECRET_FILE_ENV: &str = "TOKEN_SECRET_FILE";
const TTL_ENV: &str = "TOKEN_TTL_SECONDS";
const ALLOW_EPHEMERAL_ENV: &str = "TOKEN_ALLOW_EPHEMERAL";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const TTL_EXPECTED: &str = "a positive number of seconds";

/// Build mode for token configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing toggles.
    Debug,
    /// Release builds require explicit, valid toggles and a strong secret.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rentease::inbound::http::token_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Token settings derived from configuration.
pub struct TokenSettings {
    /// HMAC secret used to sign and verify assertions. Zeroised on drop.
    pub secret: Zeroizing<Vec<u8>>,
    /// Assertion lifetime.
    pub ttl: TimeDelta,
    /// Whether the secret was generated for this process only.
    pub ephemeral: bool,
}

/// Errors raised while validating token configuration.
#[derive(thiserror::Error, Debug)]
pub enum TokenConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the secret file failed.
    #[error("failed to read token secret at {path}: {source}")]
    SecretRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The secret file is too short for release builds.
    #[error("token secret at {path} too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// Release builds must not allow ephemeral secrets.
    #[error("TOKEN_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Build token settings from environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use rentease::inbound::http::token_config::{BuildMode, token_settings_from_env};
/// use mockable::MockEnv;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let secret_path = std::env::temp_dir().join("token_secret_example");
/// std::fs::write(&secret_path, vec![b'a'; 32])?;
///
/// let secret_path = secret_path.to_str().expect("valid path").to_string();
/// let mut env = MockEnv::new();
/// env.expect_string().returning(move |name| match name {
///     "TOKEN_SECRET_FILE" => Some(secret_path.clone()),
///     "TOKEN_TTL_SECONDS" => Some("900".to_string()),
///     "TOKEN_ALLOW_EPHEMERAL" => Some("0".to_string()),
///     _ => None,
/// });
///
/// let settings = token_settings_from_env(&env, BuildMode::Release)?;
/// assert_eq!(settings.ttl.num_seconds(), 900);
/// # Ok(())
/// # }
/// ```
pub fn token_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TokenSettings, TokenConfigError> {
    let ttl = ttl_from_env(env, mode)?;
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;
    let (secret, ephemeral) = secret_from_env(env, mode, allow_ephemeral)?;
    Ok(TokenSettings {
        secret,
        ttl,
        ephemeral,
    })
}

fn ttl_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<TimeDelta, TokenConfigError> {
    let default_ttl = TimeDelta::seconds(TOKEN_TTL_DEFAULT_SECONDS);
    let Some(value) = env.string(TTL_ENV) else {
        return Ok(default_ttl);
    };
    match value.trim().parse::<i64>() {
        Ok(seconds) if seconds > 0 => Ok(TimeDelta::seconds(seconds)),
        _ => debug_warn_or_error(
            mode,
            default_ttl,
            TokenConfigError::InvalidEnv {
                name: TTL_ENV,
                value: value.clone(),
                expected: TTL_EXPECTED,
            },
            || warn!(value = %value, "invalid TOKEN_TTL_SECONDS; using default"),
        ),
    }
}

fn allow_ephemeral_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, TokenConfigError> {
    match env.string(ALLOW_EPHEMERAL_ENV) {
        Some(value) => match parse_bool(&value) {
            Some(true) if mode.is_debug() => Ok(true),
            Some(true) => Err(TokenConfigError::EphemeralNotAllowed),
            Some(false) => Ok(false),
            None => debug_warn_or_error(
                mode,
                false,
                TokenConfigError::InvalidEnv {
                    name: ALLOW_EPHEMERAL_ENV,
                    value: value.clone(),
                    expected: BOOL_EXPECTED,
                },
                || warn!(value = %value, "invalid TOKEN_ALLOW_EPHEMERAL; defaulting to disabled"),
            ),
        },
        None => debug_warn_or_error(
            mode,
            false,
            TokenConfigError::MissingEnv {
                name: ALLOW_EPHEMERAL_ENV,
            },
            || warn!("TOKEN_ALLOW_EPHEMERAL not set; defaulting to disabled"),
        ),
    }
}

fn secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<(Zeroizing<Vec<u8>>, bool), TokenConfigError> {
    let path = PathBuf::from(
        env.string(SECRET_FILE_ENV)
            .unwrap_or_else(|| TOKEN_SECRET_DEFAULT_PATH.to_owned()),
    );

    match std::fs::read(&path).map(Zeroizing::new) {
        Ok(bytes) if !bytes.is_empty() => {
            let length = bytes.len();
            if length < TOKEN_SECRET_MIN_LEN {
                if mode == BuildMode::Release {
                    return Err(TokenConfigError::SecretTooShort {
                        path,
                        length,
                        min_len: TOKEN_SECRET_MIN_LEN,
                    });
                }
                warn!(path = %path.display(), length, "token secret is shorter than recommended");
            }
            Ok((bytes, false))
        }
        Ok(_) => ephemeral_or_error(
            mode,
            allow_ephemeral,
            &path,
            TokenConfigError::SecretTooShort {
                path: path.clone(),
                length: 0,
                min_len: TOKEN_SECRET_MIN_LEN,
            },
        ),
        Err(error) => ephemeral_or_error(
            mode,
            allow_ephemeral,
            &path,
            TokenConfigError::SecretRead {
                path: path.clone(),
                source: error,
            },
        ),
    }
}

fn ephemeral_or_error(
    mode: BuildMode,
    allow_ephemeral: bool,
    path: &std::path::Path,
    error: TokenConfigError,
) -> Result<(Zeroizing<Vec<u8>>, bool), TokenConfigError> {
    if !(mode.is_debug() || allow_ephemeral) {
        return Err(error);
    }
    warn!(
        path = %path.display(),
        error = %error,
        "using temporary token secret (dev only); tokens will not survive a restart"
    );
    let mut secret = Zeroizing::new(vec![0_u8; TOKEN_SECRET_MIN_LEN]);
    OsRng.fill_bytes(secret.as_mut_slice());
    Ok((secret, true))
}

fn debug_warn_or_error<T, F>(
    mode: BuildMode,
    fallback: T,
    error: TokenConfigError,
    warn_fn: F,
) -> Result<T, TokenConfigError>
where
    F: FnOnce(),
{
    if mode.is_debug() {
        warn_fn();
        Ok(fallback)
    } else {
        Err(error)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
