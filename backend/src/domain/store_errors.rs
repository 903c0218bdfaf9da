//! Conversions from driven-port errors into domain errors.
//!
//! Store failures are not retried by the engine: connection failures become
//! `service_unavailable` and everything else becomes `internal_error`.
//! Uniqueness conflicts are ordinary player-facing outcomes and are logged
//! below error level.

use tracing::{error, info};

use super::Error;
use super::ports::{CollectionRepositoryError, FriendRepositoryError, PlayerRepositoryError};

impl From<PlayerRepositoryError> for Error {
    fn from(value: PlayerRepositoryError) -> Self {
        if matches!(
            value,
            PlayerRepositoryError::DuplicateName { .. } | PlayerRepositoryError::DuplicateFriendCode
        ) {
            info!(error = %value, "player store conflict");
        } else {
            error!(error = %value, "player store failure");
        }
        match value {
            PlayerRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("player store unavailable: {message}"))
            }
            PlayerRepositoryError::Query { message } => {
                Error::internal(format!("player store error: {message}"))
            }
            PlayerRepositoryError::DuplicateName { name } => {
                Error::conflict(format!("player name {name} is already taken"))
            }
            PlayerRepositoryError::DuplicateFriendCode => {
                Error::conflict("could not allocate a unique friend code")
            }
        }
    }
}

impl From<CollectionRepositoryError> for Error {
    fn from(value: CollectionRepositoryError) -> Self {
        error!(error = %value, "collection store failure");
        match value {
            CollectionRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("collection store unavailable: {message}"))
            }
            CollectionRepositoryError::Query { message } => {
                Error::internal(format!("collection store error: {message}"))
            }
        }
    }
}

impl From<FriendRepositoryError> for Error {
    fn from(value: FriendRepositoryError) -> Self {
        error!(error = %value, "friend store failure");
        match value {
            FriendRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("friend store unavailable: {message}"))
            }
            FriendRepositoryError::Query { message } => {
                Error::internal(format!("friend store error: {message}"))
            }
        }
    }
}
