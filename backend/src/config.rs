//! Server settings loaded via OrthoConfig.
//!
//! Every value can come from the command line, a config file, or a
//! `RENTEASE_*` environment variable. Token settings are read separately, see
//! [`crate::inbound::http::token_config`].

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_UPLOAD_PUBLIC_PATH: &str = "/uploads";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Invalid setting values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("bind address {value:?} is not a socket address")]
    InvalidBindAddr { value: String },
    #[error("upload public path {value:?} must start with '/'")]
    InvalidPublicPath { value: String },
}

/// Process-wide settings for the RentEase server.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RENTEASE")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without it the server keeps state in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Directory avatar uploads are written to.
    pub upload_dir: Option<PathBuf>,
    /// URL prefix under which uploaded avatars are served.
    pub upload_public_path: Option<String>,
}

impl AppSettings {
    /// Parsed listen address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::InvalidBindAddr {
            value: raw.to_owned(),
        })
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .filter(|max| *max > 0)
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR))
    }

    /// Public URL prefix for avatars, which must be an absolute path.
    pub fn upload_public_path(&self) -> Result<&str, SettingsError> {
        let raw = self
            .upload_public_path
            .as_deref()
            .unwrap_or(DEFAULT_UPLOAD_PUBLIC_PATH);
        if !raw.starts_with('/') {
            return Err(SettingsError::InvalidPublicPath {
                value: raw.to_owned(),
            });
        }
        Ok(raw)
    }
}
