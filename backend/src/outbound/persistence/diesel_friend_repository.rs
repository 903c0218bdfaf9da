//! PostgreSQL-backed `FriendRepository`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{FriendRepository, FriendRepositoryError};
use crate::domain::{FriendCode, FriendSummary, PlayerId, PlayerName};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::NewFriendRow;
use super::pool::DbPool;
use super::schema::{friends, players};

/// Diesel implementation of the friend port.
#[derive(Clone)]
pub struct DieselFriendRepository {
    pool: DbPool,
}

impl DieselFriendRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_summary(
    (id, name, friend_code, since): (Uuid, String, String, DateTime<Utc>),
) -> Result<FriendSummary, FriendRepositoryError> {
    let corrupt = |err: String| FriendRepositoryError::query(format!("stored friend: {err}"));
    Ok(FriendSummary {
        player_id: PlayerId::from_uuid(id),
        name: PlayerName::new(name).map_err(|err| corrupt(err.to_string()))?,
        friend_code: FriendCode::parse(friend_code).map_err(|err| corrupt(err.to_string()))?,
        since,
    })
}

#[async_trait]
impl FriendRepository for DieselFriendRepository {
    async fn add_edge(
        &self,
        owner: &PlayerId,
        friend: &PlayerId,
        created_at: DateTime<Utc>,
    ) -> Result<bool, FriendRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = diesel::insert_into(friends::table)
            .values(NewFriendRow {
                owner_id: *owner.as_uuid(),
                friend_id: *friend.as_uuid(),
                created_at,
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted == 1)
    }

    async fn has_edge(
        &self,
        requester: &PlayerId,
        owner: &PlayerId,
    ) -> Result<bool, FriendRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(exists(
            friends::table.find((*requester.as_uuid(), *owner.as_uuid())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn list_friends(
        &self,
        owner: &PlayerId,
    ) -> Result<Vec<FriendSummary>, FriendRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(Uuid, String, String, DateTime<Utc>)> = friends::table
            .inner_join(players::table.on(players::id.eq(friends::friend_id)))
            .filter(friends::owner_id.eq(*owner.as_uuid()))
            .order(friends::created_at.asc())
            .select((
                players::id,
                players::name,
                players::friend_code,
                friends::created_at,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_summary).collect()
    }
}
