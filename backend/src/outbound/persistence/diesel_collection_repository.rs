//! PostgreSQL-backed `CollectionRepository`.
//!
//! A pull is one transaction: the history insert followed by a single
//! `INSERT ... ON CONFLICT DO UPDATE` that merges into the keyed entry.
//! Concurrent pulls of the same card serialise on the conflicting row.

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sql_types::SmallInt;
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};

use crate::domain::ports::{CollectionRepository, CollectionRepositoryError};
use crate::domain::{CardKeyDigest, CollectionEntry, PlayerId, PullRecord, PullStats, SaleOutcome};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{
    CollectionEntryRow, NewCollectionEntryRow, NewPullRow, PullRow, stored_grade,
};
use super::pool::DbPool;
use super::schema::{collection_entries, pulls};

diesel::define_sql_function!(fn greatest(a: SmallInt, b: SmallInt) -> SmallInt);

/// Diesel implementation of the collection port.
#[derive(Clone)]
pub struct DieselCollectionRepository {
    pool: DbPool,
}

impl DieselCollectionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn corrupt(message: String) -> CollectionRepositoryError {
    CollectionRepositoryError::query(message)
}

fn history_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait]
impl CollectionRepository for DieselCollectionRepository {
    async fn record_pull(
        &self,
        pull: &PullRecord,
    ) -> Result<CollectionEntry, CollectionRepositoryError> {
        let key = pull.card.key().digest();
        let history_row = NewPullRow::from(pull);
        let entry_row = NewCollectionEntryRow::first_pull(pull, &key);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: CollectionEntryRow = conn
            .transaction(|conn| {
                async move {
                    use collection_entries::{card_key, count, grade, last_at, mint, player_id};

                    diesel::insert_into(pulls::table)
                        .values(&history_row)
                        .execute(conn)
                        .await?;

                    diesel::insert_into(collection_entries::table)
                        .values(&entry_row)
                        .on_conflict((player_id, card_key))
                        .do_update()
                        .set((
                            count.eq(count + 1_i64),
                            grade.eq(greatest(grade, excluded(grade))),
                            mint.eq(mint.or(excluded(mint))),
                            last_at.eq(excluded(last_at)),
                        ))
                        .returning(CollectionEntryRow::as_returning())
                        .get_result(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        CollectionEntry::try_from(row).map_err(corrupt)
    }

    async fn list_collection(
        &self,
        player: &PlayerId,
    ) -> Result<Vec<CollectionEntry>, CollectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CollectionEntryRow> = collection_entries::table
            .filter(collection_entries::player_id.eq(*player.as_uuid()))
            .order(collection_entries::last_at.desc())
            .select(CollectionEntryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| CollectionEntry::try_from(row).map_err(corrupt))
            .collect()
    }

    async fn list_history(
        &self,
        player: &PlayerId,
        limit: usize,
    ) -> Result<Vec<PullRecord>, CollectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PullRow> = pulls::table
            .filter(pulls::player_id.eq(*player.as_uuid()))
            .order((pulls::pulled_at.desc(), pulls::id.desc()))
            .limit(history_limit(limit))
            .select(PullRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| PullRecord::try_from(row).map_err(corrupt))
            .collect()
    }

    async fn pull_stats(&self, player: &PlayerId) -> Result<PullStats, CollectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let groups: Vec<(i16, bool, i64)> = pulls::table
            .filter(pulls::player_id.eq(*player.as_uuid()))
            .group_by((pulls::grade, pulls::mint))
            .select((pulls::grade, pulls::mint, count_star()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut stats = PullStats::default();
        for (grade, mint, total) in groups {
            let grade = stored_grade(grade).map_err(corrupt)?;
            stats.record_many(grade, mint, u64::try_from(total).unwrap_or_default());
        }
        Ok(stats)
    }

    async fn remove_one(
        &self,
        player: &PlayerId,
        key: &CardKeyDigest,
    ) -> Result<Option<SaleOutcome>, CollectionRepositoryError> {
        let player_id = *player.as_uuid();
        let card_key = key.as_ref().to_owned();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                let entry = || collection_entries::table.find((player_id, card_key.as_str()));
                let remaining: Option<i64> =
                    diesel::update(entry().filter(collection_entries::count.gt(1_i64)))
                        .set(collection_entries::count.eq(collection_entries::count - 1_i64))
                        .returning(collection_entries::count)
                        .get_result(conn)
                        .await
                        .optional()?;
                if let Some(remaining) = remaining {
                    return Ok(Some(SaleOutcome::Decremented { remaining }));
                }

                let deleted = diesel::delete(entry()).execute(conn).await?;
                Ok((deleted > 0).then_some(SaleOutcome::Removed))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
