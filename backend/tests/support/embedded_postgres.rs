//! Per-test databases cloned from a migrated template.
//!
//! The template is named after a hash of `backend/migrations`, so editing a
//! migration yields a fresh template instead of a stale schema.

use std::future::Future;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use diesel::{Connection, RunQueryDsl};
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pg_embedded_setup_unpriv::test_support::hash_directory;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use rentease::domain::ports::UserRepository;
use rentease::domain::{EmailAddress, PasswordHash, User, UserId, UserName};
use rentease::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
use tokio::runtime::Runtime;
use uuid::Uuid;

use super::atexit_cleanup::shared_cluster_handle;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");
const TEMPLATE_PREFIX: &str = "rentease_template";
const CLONE_ATTEMPTS: usize = 5;
const CLONE_RETRY_DELAY: Duration = Duration::from_millis(500);

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Whole-second timestamp, so values survive `TIMESTAMPTZ` unchanged.
pub fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

fn template_name() -> Result<String, String> {
    let migrations = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let hash = hash_directory(migrations).map_err(|err| format!("hash migrations: {err}"))?;
    let short = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_PREFIX}_{short}"))
}

fn ensure_template(cluster: &ClusterHandle) -> Result<String, String> {
    let name = template_name()?;
    let _guard = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        let url = cluster.connection().database_url(&name);
        let mut conn =
            PgConnection::establish(&url).map_err(|err| format!("connect to template: {err}"))?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|err| format!("migrate template: {err}"))?;
    }
    Ok(name)
}

fn clone_template(cluster: &ClusterHandle) -> Result<TemporaryDatabase, String> {
    let mut last_error = String::from("no clone attempted");
    for attempt in 1..=CLONE_ATTEMPTS {
        let outcome = ensure_template(cluster).and_then(|template| {
            let name = format!("test_{}", Uuid::new_v4().simple());
            cluster
                .temporary_database_from_template(name.as_str(), template.as_str())
                .map_err(|err| format!("clone template: {err:?}"))
        });
        match outcome {
            Ok(database) => return Ok(database),
            Err(err) => last_error = format!("attempt {attempt}/{CLONE_ATTEMPTS}: {err}"),
        }
        if attempt < CLONE_ATTEMPTS {
            std::thread::sleep(CLONE_RETRY_DELAY);
        }
    }
    Err(last_error)
}

/// A migrated throwaway database with a small pool and a runtime to drive it.
pub struct PgFixture {
    runtime: Runtime,
    pool: DbPool,
    database_url: String,
    _database: TemporaryDatabase,
}

impl PgFixture {
    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    /// Drop `table` (and dependent constraints) to simulate schema loss.
    pub fn drop_table(&self, table: &str) {
        let mut conn = PgConnection::establish(&self.database_url).expect("connect for drop");
        diesel::sql_query(format!(r#"DROP TABLE IF EXISTS "{table}" CASCADE"#))
            .execute(&mut conn)
            .expect("drop table");
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Insert `<name>@example.com` so owner foreign keys resolve.
    pub fn seed_user(&self, name: &str) -> User {
        let user = User::register(
            UserId::random(),
            UserName::new(name).expect("fixture name"),
            EmailAddress::new(format!("{name}@example.com")).expect("fixture email"),
            fixture_timestamp(),
        );
        let users = DieselUserRepository::new(self.pool());
        self.block_on(users.insert(&user, &PasswordHash::new("$argon2id$fixture")))
            .expect("seed user");
        user
    }
}

/// Clone the template and open a pool on the copy.
pub fn provision_pg_fixture() -> Result<PgFixture, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster_handle().map_err(|err| err.to_string())?;
    let database = clone_template(cluster)?;
    let database_url = database.url().to_string();

    let config = PoolConfig::new(database_url.as_str())
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(PgFixture {
        runtime,
        pool,
        database_url,
        _database: database,
    })
}
