//! Driving port for reading and selling from the player's own collection.

use async_trait::async_trait;

use crate::domain::{CardKeyDigest, CollectionEntry, Error, PlayerId, PullRecord};

/// Collection listing together with the current balance.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionView {
    pub balance: i64,
    pub items: Vec<CollectionEntry>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionCommand: Send + Sync {
    async fn list_collection(&self, player: &PlayerId) -> Result<CollectionView, Error>;

    /// Most recent pulls, newest first.
    async fn list_history(&self, player: &PlayerId) -> Result<Vec<PullRecord>, Error>;

    /// Sell one copy of `key` and return the new balance.
    async fn sell(&self, player: &PlayerId, key: &CardKeyDigest) -> Result<i64, Error>;
}
