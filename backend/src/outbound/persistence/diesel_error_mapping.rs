//! Shared Diesel error mapping for the repository adapters.
//!
//! Every repository port error has `Connection` and `Query` variants; these
//! helpers take their constructors so each adapter maps errors the same way.

use tracing::debug;

use super::pool::PoolError;

/// Map a pool checkout or build failure onto the connection constructor.
pub(crate) fn map_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map Diesel errors onto query/connection constructors.
///
/// Database detail is logged at debug level and never copied into the
/// returned message.
pub(crate) fn map_diesel_error<E, Q, C>(error: diesel::result::Error, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            query("referenced row does not exist")
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            query("row rejected by a check constraint")
        }
        DieselError::DatabaseError(_, _) => query("database error"),
        DieselError::RollbackTransaction => query("transaction rolled back"),
        _ => query("database error"),
    }
}
