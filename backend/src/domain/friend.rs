//! Friend relation read model.

use chrono::{DateTime, Utc};

use super::{FriendCode, PlayerId, PlayerName};

/// One outgoing friend edge, joined with the friend's public identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendSummary {
    pub player_id: PlayerId,
    pub name: PlayerName,
    pub friend_code: FriendCode,
    pub since: DateTime<Utc>,
}
