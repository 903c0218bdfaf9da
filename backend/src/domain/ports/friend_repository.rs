//! Port abstraction for directed friend edges.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{FriendSummary, PlayerId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by friend repository adapters.
    pub enum FriendRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "friend repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "friend repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FriendRepository: Send + Sync {
    /// Insert the edge `owner -> friend` if absent.
    ///
    /// Returns `true` when a new edge was created.
    async fn add_edge(
        &self,
        owner: &PlayerId,
        friend: &PlayerId,
        created_at: DateTime<Utc>,
    ) -> Result<bool, FriendRepositoryError>;

    /// Whether the edge `requester -> owner` exists.
    async fn has_edge(
        &self,
        requester: &PlayerId,
        owner: &PlayerId,
    ) -> Result<bool, FriendRepositoryError>;

    /// Friends of `owner`, oldest edge first.
    async fn list_friends(
        &self,
        owner: &PlayerId,
    ) -> Result<Vec<FriendSummary>, FriendRepositoryError>;
}
