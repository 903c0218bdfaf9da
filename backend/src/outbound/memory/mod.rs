//! Process-local store implementing every persistence port.
//!
//! Used when no database URL is configured and by the HTTP integration
//! tests. All tables live behind one mutex, so each port call is a single
//! critical section with the same conditional semantics as the SQL
//! statements in [`crate::outbound::persistence`].

mod collections;
mod friends;
mod players;

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::domain::{CardKeyDigest, CollectionEntry, Player, PlayerId, PullRecord, SessionToken};

#[derive(Debug, Clone)]
struct StoredPlayer {
    player: Player,
    session: SessionToken,
}

#[derive(Debug, Clone)]
struct FriendEdge {
    owner: PlayerId,
    friend: PlayerId,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct StoreState {
    players: HashMap<PlayerId, StoredPlayer>,
    collection: HashMap<(PlayerId, CardKeyDigest), CollectionEntry>,
    pulls: Vec<PullRecord>,
    friends: Vec<FriendEdge>,
}

/// In-memory implementation of the player, collection, and friend ports.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests;
