use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{FriendRepository, FriendRepositoryError};
use crate::domain::{FriendSummary, PlayerId};

use super::{FriendEdge, InMemoryStore};

#[async_trait]
impl FriendRepository for InMemoryStore {
    async fn add_edge(
        &self,
        owner: &PlayerId,
        friend: &PlayerId,
        created_at: DateTime<Utc>,
    ) -> Result<bool, FriendRepositoryError> {
        let mut state = self.lock();
        let exists = state
            .friends
            .iter()
            .any(|edge| &edge.owner == owner && &edge.friend == friend);
        if exists {
            return Ok(false);
        }
        state.friends.push(FriendEdge {
            owner: *owner,
            friend: *friend,
            created_at,
        });
        Ok(true)
    }

    async fn has_edge(
        &self,
        requester: &PlayerId,
        owner: &PlayerId,
    ) -> Result<bool, FriendRepositoryError> {
        Ok(self
            .lock()
            .friends
            .iter()
            .any(|edge| &edge.owner == requester && &edge.friend == owner))
    }

    async fn list_friends(
        &self,
        owner: &PlayerId,
    ) -> Result<Vec<FriendSummary>, FriendRepositoryError> {
        let state = self.lock();
        let mut friends: Vec<FriendSummary> = state
            .friends
            .iter()
            .filter(|edge| &edge.owner == owner)
            .filter_map(|edge| {
                let stored = state.players.get(&edge.friend)?;
                Some(FriendSummary {
                    player_id: edge.friend,
                    name: stored.player.name.clone(),
                    friend_code: stored.player.friend_code.clone(),
                    since: edge.created_at,
                })
            })
            .collect();
        friends.sort_by_key(|friend| friend.since);
        Ok(friends)
    }
}
