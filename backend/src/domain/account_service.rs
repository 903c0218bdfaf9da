//! Account service: login, session resolution, and the profile read.
//!
//! Implements [`LoginService`] and [`ProfileQuery`]. A name seen for the
//! first time creates the account with a generated access code and friend
//! code; returning players must present their access code. Every successful
//! login rotates the session token, and every session resolution settles
//! pending income.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::ports::{
    CollectionRepository, LoginOutcome, LoginRequest, LoginService, PlayerRepository,
    PlayerRepositoryError, Profile, ProfileQuery,
};
use super::{
    AccessCode, EconomyLedger, Error, FriendCode, NewPlayer, Player, PlayerId, SessionToken,
    UniformSource,
};

const FRIEND_CODE_ATTEMPTS: usize = 3;

/// Account service over the player and collection stores.
pub struct AccountService<P, C> {
    players: Arc<P>,
    collections: Arc<C>,
    ledger: Arc<EconomyLedger<P>>,
    random: Arc<dyn UniformSource>,
}

impl<P, C> AccountService<P, C> {
    pub fn new(
        players: Arc<P>,
        collections: Arc<C>,
        ledger: Arc<EconomyLedger<P>>,
        random: Arc<dyn UniformSource>,
    ) -> Self {
        Self {
            players,
            collections,
            ledger,
            random,
        }
    }
}

impl<P, C> AccountService<P, C>
where
    P: PlayerRepository,
    C: CollectionRepository,
{
    async fn create_account(&self, request: &LoginRequest) -> Result<LoginOutcome, Error> {
        let access_code = AccessCode::generate(self.random.as_ref());
        let session = SessionToken::issue();
        let now = self.ledger.now();

        for attempt in 1..=FRIEND_CODE_ATTEMPTS {
            let new_player = NewPlayer {
                id: PlayerId::random(),
                name: request.name.clone(),
                access_code_hash: access_code.hash(),
                friend_code: FriendCode::generate(self.random.as_ref()),
                session_token: session.clone(),
                balance: self.ledger.rules().starting_balance,
                created_at: now,
            };
            match self.players.create(&new_player).await {
                Ok(player) => {
                    info!(player = %player.id, name = %player.name, "account created");
                    return Ok(LoginOutcome {
                        player,
                        session,
                        created: true,
                        access_code: Some(access_code),
                    });
                }
                Err(PlayerRepositoryError::DuplicateFriendCode) => {
                    info!(attempt, "friend code collision; regenerating");
                }
                Err(other) => return Err(other.into()),
            }
        }
        Err(PlayerRepositoryError::duplicate_friend_code().into())
    }

    async fn resume_account(
        &self,
        player: Player,
        code: Option<&AccessCode>,
    ) -> Result<LoginOutcome, Error> {
        let verified = code.is_some_and(|code| player.access_code_hash.matches(code));
        if !verified {
            return Err(Error::unauthorized("invalid name or access code"));
        }
        let session = SessionToken::issue();
        self.players.replace_session(&player.id, &session).await?;
        let player = self.ledger.settle(player).await?;
        info!(player = %player.id, "player logged in");
        Ok(LoginOutcome {
            player,
            session,
            created: false,
            access_code: None,
        })
    }
}

#[async_trait]
impl<P, C> LoginService for AccountService<P, C>
where
    P: PlayerRepository,
    C: CollectionRepository,
{
    async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome, Error> {
        match self.players.find_by_name(&request.name).await? {
            Some(player) => self.resume_account(player, request.code.as_ref()).await,
            None => self.create_account(request).await,
        }
    }

    async fn authenticate(&self, token: &SessionToken) -> Result<Player, Error> {
        let player = self
            .players
            .find_by_session(token)
            .await?
            .ok_or_else(|| Error::unauthorized("session is missing or expired"))?;
        self.ledger.settle(player).await
    }
}

#[async_trait]
impl<P, C> ProfileQuery for AccountService<P, C>
where
    P: PlayerRepository,
    C: CollectionRepository,
{
    async fn profile(&self, player: &PlayerId) -> Result<Profile, Error> {
        let player = self.ledger.settle_by_id(player).await?;
        let stats = self.collections.pull_stats(&player.id).await?;
        Ok(Profile {
            name: player.name,
            friend_code: player.friend_code,
            balance: player.balance,
            stats,
        })
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
