//! Helpers for the Diesel repository suites that run against embedded
//! PostgreSQL.
//!
//! Every test gets its own database cloned from a migrated template on one
//! process-wide cluster. Set `SKIP_TEST_CLUSTER=1` on hosts where PostgreSQL
//! cannot be started.

pub mod atexit_cleanup;
pub mod cluster_skip;
pub mod embedded_postgres;

pub use cluster_skip::handle_cluster_setup_failure;
pub use embedded_postgres::{PgFixture, fixture_timestamp, provision_pg_fixture};
