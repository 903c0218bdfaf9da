//! PostgreSQL-backed `PlayerRepository`.
//!
//! Balance writes are single conditional `UPDATE ... RETURNING` statements:
//! the debit guards on `balance >= amount` and the accrual guards on the
//! previously read `last_accrual_at`, so concurrent requests never lose an
//! update or drive the balance negative.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AccrualUpdate, PlayerRepository, PlayerRepositoryError};
use crate::domain::{FriendCode, NewPlayer, Player, PlayerId, PlayerName, SessionToken};

use super::error_mapping::{map_diesel_error, map_pool_error, unique_violation};
use super::models::{NewPlayerRow, PlayerRow};
use super::pool::DbPool;
use super::schema::players;

const NAME_CONSTRAINT: &str = "players_name_key";
const FRIEND_CODE_CONSTRAINT: &str = "players_friend_code_key";

/// Diesel implementation of the player port.
#[derive(Clone)]
pub struct DieselPlayerRepository {
    pool: DbPool,
}

impl DieselPlayerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Converts an optional lookup row into a domain player.
fn lookup_result(
    row: Result<PlayerRow, diesel::result::Error>,
) -> Result<Option<Player>, PlayerRepositoryError> {
    row.optional()
        .map_err(map_diesel_error)?
        .map(to_player)
        .transpose()
}

fn to_player(row: PlayerRow) -> Result<Player, PlayerRepositoryError> {
    Player::try_from(row).map_err(PlayerRepositoryError::query)
}

fn map_create_error(error: diesel::result::Error, name: &PlayerName) -> PlayerRepositoryError {
    match unique_violation(&error) {
        Some(NAME_CONSTRAINT) => PlayerRepositoryError::duplicate_name(name.to_string()),
        Some(FRIEND_CODE_CONSTRAINT) => PlayerRepositoryError::DuplicateFriendCode,
        _ => map_diesel_error(error),
    }
}

#[async_trait]
impl PlayerRepository for DieselPlayerRepository {
    async fn create(&self, player: &NewPlayer) -> Result<Player, PlayerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(players::table)
            .values(NewPlayerRow::from(player))
            .returning(PlayerRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|error| map_create_error(error, &player.name))?;
        to_player(row)
    }

    async fn find_by_id(&self, id: &PlayerId) -> Result<Option<Player>, PlayerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = players::table
            .filter(players::id.eq(*id.as_uuid()))
            .select(PlayerRow::as_select())
            .first(&mut conn)
            .await;
        lookup_result(row)
    }

    async fn find_by_name(
        &self,
        name: &PlayerName,
    ) -> Result<Option<Player>, PlayerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = players::table
            .filter(players::name.eq(name.as_ref()))
            .select(PlayerRow::as_select())
            .first(&mut conn)
            .await;
        lookup_result(row)
    }

    async fn find_by_session(
        &self,
        token: &SessionToken,
    ) -> Result<Option<Player>, PlayerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = players::table
            .filter(players::session_token.eq(token.as_ref()))
            .select(PlayerRow::as_select())
            .first(&mut conn)
            .await;
        lookup_result(row)
    }

    async fn find_by_friend_code(
        &self,
        code: &FriendCode,
    ) -> Result<Option<Player>, PlayerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = players::table
            .filter(players::friend_code.eq(code.as_ref()))
            .select(PlayerRow::as_select())
            .first(&mut conn)
            .await;
        lookup_result(row)
    }

    async fn replace_session(
        &self,
        id: &PlayerId,
        token: &SessionToken,
    ) -> Result<(), PlayerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(players::table.find(*id.as_uuid()))
            .set(players::session_token.eq(token.as_ref()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn apply_accrual(
        &self,
        id: &PlayerId,
        update: AccrualUpdate,
    ) -> Result<Option<Player>, PlayerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(
            players::table
                .find(*id.as_uuid())
                .filter(players::last_accrual_at.eq(update.expected_last_accrual_at)),
        )
        .set((
            players::balance.eq(players::balance + update.credit),
            players::last_accrual_at.eq(update.last_accrual_at),
        ))
        .returning(PlayerRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        row.map(to_player).transpose()
    }

    async fn debit(
        &self,
        id: &PlayerId,
        amount: i64,
    ) -> Result<Option<i64>, PlayerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(
            players::table
                .find(*id.as_uuid())
                .filter(players::balance.ge(amount)),
        )
        .set(players::balance.eq(players::balance - amount))
        .returning(players::balance)
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)
    }

    async fn credit(
        &self,
        id: &PlayerId,
        amount: i64,
    ) -> Result<Option<i64>, PlayerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(players::table.find(*id.as_uuid()))
            .set(players::balance.eq(players::balance + amount))
            .returning(players::balance)
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }
}
