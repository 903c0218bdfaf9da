//! Port abstraction for player account persistence.
//!
//! Balance mutations are conditional single statements in every adapter:
//! a debit only applies when the balance covers it, and an accrual only
//! applies when the stored timestamp still matches the one it was computed
//! from.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{FriendCode, NewPlayer, Player, PlayerId, PlayerName, SessionToken};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by player repository adapters.
    pub enum PlayerRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "player repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "player repository query failed: {message}",
        /// The chosen name is already taken.
        DuplicateName { name: String } => "player name already taken: {name}",
        /// The generated friend code collided with an existing one.
        DuplicateFriendCode => "friend code already in use",
    }
}

/// Conditional accrual update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccrualUpdate {
    /// Timestamp the accrual was computed from.
    pub expected_last_accrual_at: DateTime<Utc>,
    /// Currency to add.
    pub credit: i64,
    /// New accrual timestamp.
    pub last_accrual_at: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// Insert a new account together with its first session token.
    async fn create(&self, player: &NewPlayer) -> Result<Player, PlayerRepositoryError>;

    async fn find_by_id(&self, id: &PlayerId) -> Result<Option<Player>, PlayerRepositoryError>;

    async fn find_by_name(
        &self,
        name: &PlayerName,
    ) -> Result<Option<Player>, PlayerRepositoryError>;

    async fn find_by_session(
        &self,
        token: &SessionToken,
    ) -> Result<Option<Player>, PlayerRepositoryError>;

    async fn find_by_friend_code(
        &self,
        code: &FriendCode,
    ) -> Result<Option<Player>, PlayerRepositoryError>;

    /// Replace the stored session token, invalidating the previous one.
    async fn replace_session(
        &self,
        id: &PlayerId,
        token: &SessionToken,
    ) -> Result<(), PlayerRepositoryError>;

    /// Apply `update` if the stored accrual timestamp still matches.
    ///
    /// Returns the updated player, or `None` when another request settled
    /// first.
    async fn apply_accrual(
        &self,
        id: &PlayerId,
        update: AccrualUpdate,
    ) -> Result<Option<Player>, PlayerRepositoryError>;

    /// Subtract `amount` if the balance covers it.
    ///
    /// Returns the new balance, or `None` when funds are insufficient or the
    /// player does not exist.
    async fn debit(&self, id: &PlayerId, amount: i64)
    -> Result<Option<i64>, PlayerRepositoryError>;

    /// Add `amount` and return the new balance, or `None` for an unknown id.
    async fn credit(
        &self,
        id: &PlayerId,
        amount: i64,
    ) -> Result<Option<i64>, PlayerRepositoryError>;
}
