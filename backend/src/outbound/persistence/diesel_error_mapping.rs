//! Shared Diesel error mapping for the RentEase repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// Unique constraint names and the domain field they guard.
const UNIQUE_CONSTRAINTS: &[(&str, &str)] = &[("users_email_key", "email"), ("users_name_key", "name")];

/// Map common Diesel failures onto a repository's query/connection
/// constructors.
pub(super) fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    log_diesel_error(&error);
    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => query("database error"),
        _ => query("database error"),
    }
}

/// Field name guarded by the violated unique constraint, if any.
///
/// Falls back to inspecting the message when the driver omits the
/// constraint name.
pub(super) fn unique_violation_field(error: &DieselError) -> Option<&'static str> {
    let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = error else {
        return None;
    };
    let haystack = info
        .constraint_name()
        .map_or_else(|| info.message().to_owned(), str::to_owned);
    UNIQUE_CONSTRAINTS
        .iter()
        .find(|(constraint, _)| haystack.contains(constraint))
        .map(|(_, field)| *field)
}

fn log_diesel_error(error: &DieselError) {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            "diesel operation failed"
        ),
    }
}
