//! In-process repositories used when no database is configured.
//!
//! They honour the same contracts as the Diesel adapters (unique name and
//! email, `(id, owner)` predicates, newest-first listings) so the services
//! and HTTP tests behave identically against either backend. State is lost
//! on restart.

mod items;
mod rentals;
mod users;

use std::sync::{Mutex, MutexGuard};

pub use items::InMemoryItemRepository;
pub use rentals::InMemoryRentalRepository;
pub use users::InMemoryUserRepository;

/// Lock a store, reporting a poisoned mutex through the caller's error type.
fn lock_store<'a, T, E>(
    store: &'a Mutex<T>,
    query: impl FnOnce(&'static str) -> E,
) -> Result<MutexGuard<'a, T>, E> {
    store
        .lock()
        .map_err(|_| query("in-memory store lock poisoned"))
}
