//! Driving port for the profile read.

use async_trait::async_trait;

use crate::domain::{Error, FriendCode, PlayerId, PlayerName, PullStats};

/// Profile summary for the authenticated player.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub name: PlayerName,
    pub friend_code: FriendCode,
    pub balance: i64,
    pub stats: PullStats,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    async fn profile(&self, player: &PlayerId) -> Result<Profile, Error>;
}
