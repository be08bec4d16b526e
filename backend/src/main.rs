//! Backend entry-point: loads settings, wires adapters, and serves the REST API.

mod server;

use std::io;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use rentease::config::AppSettings;
use rentease::inbound::http::health::HealthState;
use rentease::inbound::http::token_config::fingerprint::secret_fingerprint;
use rentease::inbound::http::token_config::{BuildMode, token_settings_from_env};
use rentease::outbound::avatar::FilesystemAvatarStore;
use rentease::outbound::credentials::JwtIdentityAssertions;
use rentease::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|e| io::Error::other(e.to_string()))?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let public_path = settings.upload_public_path().map_err(io::Error::other)?;

    let tokens = token_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(io::Error::other)?;
    info!(
        fingerprint = %secret_fingerprint(&tokens.secret),
        ttl_seconds = tokens.ttl.num_seconds(),
        ephemeral = tokens.ephemeral,
        "token signing secret loaded"
    );
    let assertions = JwtIdentityAssertions::new(&tokens.secret, tokens.ttl);
    drop(tokens);

    let upload_dir = settings.upload_dir();
    let avatars = FilesystemAvatarStore::open(&upload_dir, public_path).map_err(|e| {
        io::Error::other(format!(
            "failed to open upload directory {}: {e}",
            upload_dir.display()
        ))
    })?;

    let mut config = ServerConfig::new(bind_addr, assertions, avatars);
    if let Some(url) = settings.database_url() {
        run_pending_migrations(url)
            .await
            .map_err(io::Error::other)?;
        let pool = DbPool::new(
            PoolConfig::new(url).with_max_size(settings.db_max_connections()),
        )
        .await
        .map_err(io::Error::other)?;
        config = config.with_db_pool(pool);
    } else {
        warn!("no database configured; state is kept in memory and lost on restart");
    }

    let health_state = web::Data::new(HealthState::new(config.storage()));
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, storage = ?health_state.storage(), "rentease server listening");
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
