//! Port abstraction for collection entries and the pull history.

use async_trait::async_trait;

use crate::domain::{CardKeyDigest, CollectionEntry, PlayerId, PullRecord, PullStats, SaleOutcome};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by collection repository adapters.
    pub enum CollectionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "collection repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "collection repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionRepository: Send + Sync {
    /// Append `pull` to the history and merge it into the collection.
    ///
    /// The merge is one atomic upsert: count grows by one, grade keeps the
    /// maximum, mint is sticky, and `last_at` takes the pull timestamp.
    async fn record_pull(
        &self,
        pull: &PullRecord,
    ) -> Result<CollectionEntry, CollectionRepositoryError>;

    /// Entries held by `player`, most recently acquired first.
    async fn list_collection(
        &self,
        player: &PlayerId,
    ) -> Result<Vec<CollectionEntry>, CollectionRepositoryError>;

    /// Up to `limit` pull records, newest first.
    async fn list_history(
        &self,
        player: &PlayerId,
        limit: usize,
    ) -> Result<Vec<PullRecord>, CollectionRepositoryError>;

    /// Aggregate statistics over the full history.
    async fn pull_stats(&self, player: &PlayerId) -> Result<PullStats, CollectionRepositoryError>;

    /// Remove one copy of the card keyed by `key`.
    ///
    /// Returns `None` when the player holds no such card.
    async fn remove_one(
        &self,
        player: &PlayerId,
        key: &CardKeyDigest,
    ) -> Result<Option<SaleOutcome>, CollectionRepositoryError>;
}
