//! Friend edges and friend-scoped collection reads.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use super::ports::{CollectionRepository, FriendRepository, FriendsCommand, PlayerRepository};
use super::{CollectionEntry, Error, FriendCode, FriendSummary, Player, PlayerId};

/// Service implementing [`FriendsCommand`].
pub struct FriendService<P, F, C> {
    players: Arc<P>,
    friends: Arc<F>,
    collections: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<P, F, C> FriendService<P, F, C> {
    pub fn new(
        players: Arc<P>,
        friends: Arc<F>,
        collections: Arc<C>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            players,
            friends,
            collections,
            clock,
        }
    }
}

impl<P, F, C> FriendService<P, F, C>
where
    P: PlayerRepository,
{
    async fn player_with_code(&self, code: &FriendCode) -> Result<Player, Error> {
        self.players
            .find_by_friend_code(code)
            .await?
            .ok_or_else(|| Error::not_found("no player has that friend code"))
    }
}

#[async_trait]
impl<P, F, C> FriendsCommand for FriendService<P, F, C>
where
    P: PlayerRepository,
    F: FriendRepository,
    C: CollectionRepository,
{
    async fn add_friend(
        &self,
        player: &PlayerId,
        code: &FriendCode,
    ) -> Result<FriendSummary, Error> {
        let friend = self.player_with_code(code).await?;
        if friend.id == *player {
            return Err(Error::invalid_request("you cannot add yourself as a friend"));
        }

        let now = self.clock.utc();
        let created = self.friends.add_edge(player, &friend.id, now).await?;
        if created {
            info!(player = %player, friend = %friend.id, "friend added");
        }
        let since = if created {
            now
        } else {
            self.friends
                .list_friends(player)
                .await?
                .into_iter()
                .find(|summary| summary.player_id == friend.id)
                .map_or(now, |summary| summary.since)
        };
        Ok(FriendSummary {
            player_id: friend.id,
            name: friend.name,
            friend_code: friend.friend_code,
            since,
        })
    }

    async fn list_friends(&self, player: &PlayerId) -> Result<Vec<FriendSummary>, Error> {
        Ok(self.friends.list_friends(player).await?)
    }

    async fn friend_collection(
        &self,
        player: &PlayerId,
        code: &FriendCode,
    ) -> Result<Vec<CollectionEntry>, Error> {
        let owner = self.player_with_code(code).await?;
        if !self.friends.has_edge(player, &owner.id).await? {
            return Err(Error::forbidden("add this player as a friend first"));
        }
        Ok(self.collections.list_collection(&owner.id).await?)
    }
}
