//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories are thin translators between Diesel rows and domain
//! aggregates: row structs (`models.rs`) and table definitions (`schema.rs`)
//! never leave this module, and every Diesel or pool failure is mapped onto
//! the port's typed error.
//!
//! ```ignore
//! use rentease::outbound::persistence::{DbPool, DieselItemRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/rentease")).await?;
//! let items = DieselItemRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_item_repository;
mod diesel_rental_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_item_repository::DieselItemRepository;
pub use diesel_rental_repository::DieselRentalRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
