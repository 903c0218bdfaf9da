//! Shared translation of pool and Diesel failures into port errors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{
    CollectionRepositoryError, FriendRepositoryError, PlayerRepositoryError,
};

use super::pool::PoolError;

/// Port errors carrying the common connection and query variants.
pub(super) trait StoreError: Sized {
    fn from_connection(message: String) -> Self;
    fn from_query(message: String) -> Self;
}

macro_rules! impl_store_error {
    ($($error:ty),* $(,)?) => {
        $(
            impl StoreError for $error {
                fn from_connection(message: String) -> Self {
                    <$error>::connection(message)
                }

                fn from_query(message: String) -> Self {
                    <$error>::query(message)
                }
            }
        )*
    };
}

impl_store_error!(
    PlayerRepositoryError,
    CollectionRepositoryError,
    FriendRepositoryError,
);

pub(super) fn map_pool_error<E: StoreError>(error: PoolError) -> E {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            E::from_connection(message)
        }
    }
}

pub(super) fn map_diesel_error<E: StoreError>(error: DieselError) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            E::from_connection("database connection closed".to_owned())
        }
        DieselError::NotFound => E::from_query("record not found".to_owned()),
        _ => E::from_query("database error".to_owned()),
    }
}

/// Unique constraint named by a violation, if any.
pub(super) fn unique_violation(error: &DieselError) -> Option<&str> {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            Some(info.constraint_name().unwrap_or_default())
        }
        _ => None,
    }
}
