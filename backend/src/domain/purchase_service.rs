//! Purchase transaction: settle, debit, draw, grade, record.
//!
//! The pull cost is debited before the card is drawn. If the draw or the
//! record step fails, the exact debit is credited back before the error is
//! returned, so a failed purchase leaves the balance where it started.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use super::ports::{CollectionRepository, PlayerRepository, PurchaseCommand, PurchaseReceipt};
use super::{
    CardResolver, EconomyLedger, Error, PlayerId, PullRecord, UniformSource, roll_grade, roll_mint,
};

/// Service implementing [`PurchaseCommand`].
pub struct PurchaseService<P, C> {
    ledger: Arc<EconomyLedger<P>>,
    collections: Arc<C>,
    resolver: Arc<CardResolver>,
    random: Arc<dyn UniformSource>,
}

impl<P, C> PurchaseService<P, C> {
    pub fn new(
        ledger: Arc<EconomyLedger<P>>,
        collections: Arc<C>,
        resolver: Arc<CardResolver>,
        random: Arc<dyn UniformSource>,
    ) -> Self {
        Self {
            ledger,
            collections,
            resolver,
            random,
        }
    }
}

impl<P, C> PurchaseService<P, C>
where
    P: PlayerRepository,
    C: CollectionRepository,
{
    async fn refund_after(&self, player: &PlayerId, amount: i64, cause: Error) -> Error {
        match self.ledger.refund(player, amount).await {
            Ok(_) => cause,
            Err(refund_error) => {
                error!(
                    player = %player,
                    amount,
                    cause = %cause,
                    error = %refund_error,
                    "refund after failed purchase did not apply"
                );
                refund_error
            }
        }
    }
}

#[async_trait]
impl<P, C> PurchaseCommand for PurchaseService<P, C>
where
    P: PlayerRepository,
    C: CollectionRepository,
{
    async fn purchase_one(&self, player: &PlayerId) -> Result<PurchaseReceipt, Error> {
        let cost = self.ledger.rules().pull_cost;
        self.ledger.settle_by_id(player).await?;
        let balance = self.ledger.debit(player, cost).await?;

        let drawn = match self.resolver.draw_card().await {
            Ok(drawn) => drawn,
            Err(cause) => return Err(self.refund_after(player, cost, cause).await),
        };

        let grade = roll_grade(self.random.as_ref());
        let mint = roll_mint(self.random.as_ref(), grade);
        let pull = PullRecord {
            player_id: *player,
            card: drawn.card,
            grade,
            mint,
            pulled_at: self.ledger.now(),
        };
        let entry = match self.collections.record_pull(&pull).await {
            Ok(entry) => entry,
            Err(cause) => return Err(self.refund_after(player, cost, cause.into()).await),
        };

        info!(
            player = %player,
            card = %pull.card.name,
            grade = %grade,
            mint,
            origin = drawn.origin.as_str(),
            tries = drawn.tries,
            balance,
            "pull purchased"
        );
        Ok(PurchaseReceipt {
            balance,
            card: pull.card,
            key: entry.key,
            grade,
            mint,
            origin: drawn.origin,
        })
    }
}

#[cfg(test)]
#[path = "purchase_service_tests.rs"]
mod tests;
