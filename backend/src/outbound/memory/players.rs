use async_trait::async_trait;

use crate::domain::ports::{AccrualUpdate, PlayerRepository, PlayerRepositoryError};
use crate::domain::{FriendCode, NewPlayer, Player, PlayerId, PlayerName, SessionToken};

use super::{InMemoryStore, StoredPlayer};

#[async_trait]
impl PlayerRepository for InMemoryStore {
    async fn create(&self, player: &NewPlayer) -> Result<Player, PlayerRepositoryError> {
        let mut state = self.lock();
        let existing = state.players.values().map(|stored| &stored.player);
        for other in existing {
            if other.name == player.name {
                return Err(PlayerRepositoryError::duplicate_name(player.name.to_string()));
            }
            if other.friend_code == player.friend_code {
                return Err(PlayerRepositoryError::DuplicateFriendCode);
            }
        }
        let created = player.to_player();
        state.players.insert(
            player.id,
            StoredPlayer {
                player: created.clone(),
                session: player.session_token.clone(),
            },
        );
        Ok(created)
    }

    async fn find_by_id(&self, id: &PlayerId) -> Result<Option<Player>, PlayerRepositoryError> {
        Ok(self.lock().players.get(id).map(|stored| stored.player.clone()))
    }

    async fn find_by_name(
        &self,
        name: &PlayerName,
    ) -> Result<Option<Player>, PlayerRepositoryError> {
        Ok(self.find_player(|player| &player.name == name))
    }

    async fn find_by_session(
        &self,
        token: &SessionToken,
    ) -> Result<Option<Player>, PlayerRepositoryError> {
        let state = self.lock();
        Ok(state
            .players
            .values()
            .find(|stored| &stored.session == token)
            .map(|stored| stored.player.clone()))
    }

    async fn find_by_friend_code(
        &self,
        code: &FriendCode,
    ) -> Result<Option<Player>, PlayerRepositoryError> {
        Ok(self.find_player(|player| &player.friend_code == code))
    }

    async fn replace_session(
        &self,
        id: &PlayerId,
        token: &SessionToken,
    ) -> Result<(), PlayerRepositoryError> {
        if let Some(stored) = self.lock().players.get_mut(id) {
            stored.session = token.clone();
        }
        Ok(())
    }

    async fn apply_accrual(
        &self,
        id: &PlayerId,
        update: AccrualUpdate,
    ) -> Result<Option<Player>, PlayerRepositoryError> {
        let mut state = self.lock();
        let Some(stored) = state.players.get_mut(id) else {
            return Ok(None);
        };
        if stored.player.last_accrual_at != update.expected_last_accrual_at {
            return Ok(None);
        }
        stored.player.balance = stored.player.balance.saturating_add(update.credit);
        stored.player.last_accrual_at = update.last_accrual_at;
        Ok(Some(stored.player.clone()))
    }

    async fn debit(
        &self,
        id: &PlayerId,
        amount: i64,
    ) -> Result<Option<i64>, PlayerRepositoryError> {
        let mut state = self.lock();
        let Some(stored) = state.players.get_mut(id) else {
            return Ok(None);
        };
        if stored.player.balance < amount {
            return Ok(None);
        }
        stored.player.balance -= amount;
        Ok(Some(stored.player.balance))
    }

    async fn credit(
        &self,
        id: &PlayerId,
        amount: i64,
    ) -> Result<Option<i64>, PlayerRepositoryError> {
        let mut state = self.lock();
        Ok(state.players.get_mut(id).map(|stored| {
            stored.player.balance = stored.player.balance.saturating_add(amount);
            stored.player.balance
        }))
    }
}

impl InMemoryStore {
    fn find_player(&self, predicate: impl Fn(&Player) -> bool) -> Option<Player> {
        self.lock()
            .players
            .values()
            .map(|stored| &stored.player)
            .find(|player| predicate(player))
            .cloned()
    }
}
