//! Driving port for friend edges and friend-scoped collection reads.

use async_trait::async_trait;

use crate::domain::{CollectionEntry, Error, FriendCode, FriendSummary, PlayerId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FriendsCommand: Send + Sync {
    /// Follow the player holding `code`. Adding oneself is rejected.
    async fn add_friend(&self, player: &PlayerId, code: &FriendCode)
    -> Result<FriendSummary, Error>;

    async fn list_friends(&self, player: &PlayerId) -> Result<Vec<FriendSummary>, Error>;

    /// Read the collection of the player holding `code`.
    ///
    /// Fails with `forbidden` unless `player` already follows them.
    async fn friend_collection(
        &self,
        player: &PlayerId,
        code: &FriendCode,
    ) -> Result<Vec<CollectionEntry>, Error>;
}
