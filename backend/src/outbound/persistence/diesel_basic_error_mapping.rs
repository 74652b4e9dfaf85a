//! Diesel error classification shared by the repositories.
//!
//! Every repository port exposes the same failure categories (connection,
//! query, unique violation, missing reference), so the Diesel error is
//! classified once here and each repository supplies constructors for the
//! categories its port knows about.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Storage failure category independent of any particular port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreFailure {
    Connection(String),
    Query(String),
    /// Unique constraint violated; carries the offending column name.
    UniqueViolation(String),
    /// Foreign key violated; carries the constraint or message.
    MissingReference(String),
}

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Column named by a unique constraint such as `users_email_key`.
fn unique_column(constraint: Option<&str>) -> String {
    constraint
        .and_then(|name| name.strip_suffix("_key"))
        .and_then(|name| name.rsplit('_').next())
        .unwrap_or("value")
        .to_owned()
}

/// Classify a Diesel error.
pub(crate) fn classify_diesel_error(error: DieselError) -> StoreFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = ?info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => StoreFailure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => StoreFailure::Query("database query error".to_owned()),
        DieselError::DatabaseError(kind, info) => match kind {
            DatabaseErrorKind::UniqueViolation => {
                StoreFailure::UniqueViolation(unique_column(info.constraint_name()))
            }
            DatabaseErrorKind::ForeignKeyViolation => StoreFailure::MissingReference(
                info.constraint_name()
                    .unwrap_or_else(|| info.message())
                    .to_owned(),
            ),
            DatabaseErrorKind::ClosedConnection => {
                StoreFailure::Connection("database connection error".to_owned())
            }
            _ => StoreFailure::Query("database error".to_owned()),
        },
        _ => StoreFailure::Query("database error".to_owned()),
    }
}
