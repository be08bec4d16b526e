//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories using Diesel ORM
//! - **memory**: process-local repositories for development and tests
//! - **credentials**: Argon2id hashing and JWT identity assertions
//! - **avatar**: filesystem avatar storage
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod avatar;
pub mod credentials;
pub mod memory;
pub mod persistence;
