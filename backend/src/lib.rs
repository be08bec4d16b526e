//! RentEase backend library: identity, listings, and rentals behind a REST
//! API.
//!
//! The crate follows a hexagonal layout. [`domain`] holds the model, the
//! services, and the ports they depend on. [`inbound`] adapts HTTP requests
//! onto the driving ports and [`outbound`] implements the driven ports with
//! PostgreSQL, Argon2, JWT, and the filesystem.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(test)]
mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
