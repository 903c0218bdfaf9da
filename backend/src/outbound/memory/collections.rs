use std::cmp::Reverse;

use async_trait::async_trait;

use crate::domain::ports::{CollectionRepository, CollectionRepositoryError};
use crate::domain::{CardKeyDigest, CollectionEntry, PlayerId, PullRecord, PullStats, SaleOutcome};

use super::InMemoryStore;

#[async_trait]
impl CollectionRepository for InMemoryStore {
    async fn record_pull(
        &self,
        pull: &PullRecord,
    ) -> Result<CollectionEntry, CollectionRepositoryError> {
        let mut state = self.lock();
        state.pulls.push(pull.clone());
        let key = (pull.player_id, pull.card.key().digest());
        let entry = state
            .collection
            .entry(key)
            .and_modify(|entry| entry.merge(pull))
            .or_insert_with(|| CollectionEntry::first_pull(pull));
        Ok(entry.clone())
    }

    async fn list_collection(
        &self,
        player: &PlayerId,
    ) -> Result<Vec<CollectionEntry>, CollectionRepositoryError> {
        let state = self.lock();
        let mut entries: Vec<CollectionEntry> = state
            .collection
            .iter()
            .filter(|((owner, _), _)| owner == player)
            .map(|(_, entry)| entry.clone())
            .collect();
        entries.sort_by_key(|entry| Reverse(entry.last_at));
        Ok(entries)
    }

    async fn list_history(
        &self,
        player: &PlayerId,
        limit: usize,
    ) -> Result<Vec<PullRecord>, CollectionRepositoryError> {
        let state = self.lock();
        Ok(state
            .pulls
            .iter()
            .rev()
            .filter(|pull| &pull.player_id == player)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn pull_stats(&self, player: &PlayerId) -> Result<PullStats, CollectionRepositoryError> {
        let state = self.lock();
        Ok(state
            .pulls
            .iter()
            .filter(|pull| &pull.player_id == player)
            .map(|pull| (pull.grade, pull.mint))
            .collect())
    }

    async fn remove_one(
        &self,
        player: &PlayerId,
        key: &CardKeyDigest,
    ) -> Result<Option<SaleOutcome>, CollectionRepositoryError> {
        let mut state = self.lock();
        let slot = (*player, key.clone());
        let Some(entry) = state.collection.get_mut(&slot) else {
            return Ok(None);
        };
        if entry.count > 1 {
            entry.count -= 1;
            return Ok(Some(SaleOutcome::Decremented {
                remaining: entry.count,
            }));
        }
        state.collection.remove(&slot);
        Ok(Some(SaleOutcome::Removed))
    }
}
