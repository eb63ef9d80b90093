//! Shared Diesel error mapping for the repository adapters.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// Classification of a Diesel failure in port-error terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection was lost mid-operation.
    Connection,
    /// A unique constraint rejected the write.
    UniqueViolation,
    /// Any other query failure.
    Query,
}

/// Log and classify a Diesel error.
///
/// Database messages are logged at debug level only; callers build
/// port errors from the fixed text returned alongside the class.
pub(crate) fn classify_diesel_error(error: &DieselError) -> (DieselFailure, &'static str) {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            (DieselFailure::Connection, "database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            (DieselFailure::UniqueViolation, "unique constraint violated")
        }
        DieselError::NotFound => (DieselFailure::Query, "record not found"),
        DieselError::QueryBuilderError(_) => (DieselFailure::Query, "database query error"),
        _ => (DieselFailure::Query, "database error"),
    }
}
