//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use rentease::inbound::http::health::StorageBackend;
use rentease::outbound::avatar::FilesystemAvatarStore;
use rentease::outbound::credentials::JwtIdentityAssertions;
use rentease::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) assertions: Arc<JwtIdentityAssertions>,
    pub(crate) avatars: Arc<FilesystemAvatarStore>,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration that keeps state in memory.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        assertions: JwtIdentityAssertions,
        avatars: FilesystemAvatarStore,
    ) -> Self {
        Self {
            bind_addr,
            assertions: Arc::new(assertions),
            avatars: Arc::new(avatars),
            db_pool: None,
        }
    }

    /// Attach a database connection pool; repositories switch to Diesel.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Storage the repositories will be wired to.
    #[must_use]
    pub fn storage(&self) -> StorageBackend {
        if self.db_pool.is_some() {
            StorageBackend::Postgres
        } else {
            StorageBackend::Memory
        }
    }
}
