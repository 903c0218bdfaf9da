//! Own-collection reads and sales.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::ports::{CollectionCommand, CollectionRepository, CollectionView, PlayerRepository};
use super::{CardKeyDigest, EconomyLedger, Error, PlayerId, PullRecord, SaleOutcome};

/// Service implementing [`CollectionCommand`].
pub struct CollectionService<P, C> {
    ledger: Arc<EconomyLedger<P>>,
    collections: Arc<C>,
}

impl<P, C> CollectionService<P, C> {
    pub fn new(ledger: Arc<EconomyLedger<P>>, collections: Arc<C>) -> Self {
        Self {
            ledger,
            collections,
        }
    }
}

#[async_trait]
impl<P, C> CollectionCommand for CollectionService<P, C>
where
    P: PlayerRepository,
    C: CollectionRepository,
{
    async fn list_collection(&self, player: &PlayerId) -> Result<CollectionView, Error> {
        let account = self.ledger.settle_by_id(player).await?;
        let items = self.collections.list_collection(player).await?;
        Ok(CollectionView {
            balance: account.balance,
            items,
        })
    }

    async fn list_history(&self, player: &PlayerId) -> Result<Vec<PullRecord>, Error> {
        let limit = self.ledger.rules().history_limit;
        Ok(self.collections.list_history(player, limit).await?)
    }

    async fn sell(&self, player: &PlayerId, key: &CardKeyDigest) -> Result<i64, Error> {
        let outcome = self
            .collections
            .remove_one(player, key)
            .await?
            .ok_or_else(|| Error::not_owned("card is not in your collection"))?;
        let balance = self
            .ledger
            .credit(player, self.ledger.rules().sale_price)
            .await?;
        let remaining = match outcome {
            SaleOutcome::Decremented { remaining } => remaining,
            SaleOutcome::Removed => 0,
        };
        info!(player = %player, key = %key, remaining, balance, "card sold");
        Ok(balance)
    }
}
