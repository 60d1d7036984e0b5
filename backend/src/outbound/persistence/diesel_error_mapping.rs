//! Shared translation of pool and Diesel failures into port errors.
//!
//! Messages keep the driver's text because port errors only ever reach
//! server-side logs; the domain wraps them into an internal error before
//! anything is rendered to a client.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map a pool failure through the adapter's connection constructor.
pub(crate) fn map_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    connection(error.message().to_owned())
}

/// Map a Diesel failure to a connection or query error.
///
/// Closed connections count as connection failures; everything else is a
/// query failure.
pub(crate) fn map_diesel_error<E, Q, C>(
    error: DieselError,
    operation: &str,
    query: Q,
    connection: C,
) -> E
where
    Q: FnOnce(String) -> E,
    C: FnOnce(String) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), operation, "diesel operation failed");
        }
        other => debug!(error = %other, operation, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            connection(format!("{operation}: {}", info.message()))
        }
        other => query(format!("{operation}: {other}")),
    }
}
