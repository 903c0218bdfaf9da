//! Balance mutations: lazy accrual settlement, debits, credits, and refunds.
//!
//! Every mutation is a single conditional statement in the store. Accrual is
//! computed here from the player's snapshot and applied only if the stored
//! timestamp is unchanged; on a lost race the player is reloaded and the
//! settlement recomputed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{debug, warn};

use super::ports::{AccrualUpdate, PlayerRepository};
use super::{EconomyRules, Error, Player, PlayerId, accrue};

const SETTLE_ATTEMPTS: usize = 3;

/// Ledger over the player store.
pub struct EconomyLedger<P> {
    players: Arc<P>,
    clock: Arc<dyn Clock>,
    rules: EconomyRules,
}

impl<P> EconomyLedger<P> {
    pub fn new(players: Arc<P>, clock: Arc<dyn Clock>, rules: EconomyRules) -> Self {
        Self {
            players,
            clock,
            rules,
        }
    }

    pub fn rules(&self) -> &EconomyRules {
        &self.rules
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }
}

impl<P> EconomyLedger<P>
where
    P: PlayerRepository,
{
    /// Credit pending income to `player` and return the settled account.
    pub async fn settle(&self, mut player: Player) -> Result<Player, Error> {
        for _ in 0..SETTLE_ATTEMPTS {
            let accrual = accrue(
                &self.rules,
                player.balance,
                player.last_accrual_at,
                self.clock.utc(),
            );
            if accrual.is_noop() {
                return Ok(player);
            }

            let update = AccrualUpdate {
                expected_last_accrual_at: player.last_accrual_at,
                credit: accrual.balance - player.balance,
                last_accrual_at: accrual.last_accrual_at,
            };
            if let Some(updated) = self.players.apply_accrual(&player.id, update).await? {
                debug!(
                    player = %updated.id,
                    ticks = accrual.ticks,
                    balance = updated.balance,
                    "income settled"
                );
                return Ok(updated);
            }

            player = self
                .players
                .find_by_id(&player.id)
                .await?
                .ok_or_else(|| Error::unauthorized("player no longer exists"))?;
        }
        // Concurrent requests keep settling this player; whichever won has
        // already credited the same ticks.
        Ok(player)
    }

    /// Load and settle the player with `id`.
    pub async fn settle_by_id(&self, id: &PlayerId) -> Result<Player, Error> {
        let player = self
            .players
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("player not found"))?;
        self.settle(player).await
    }

    /// Subtract `amount`, failing with `insufficient_funds` when the balance
    /// does not cover it.
    pub async fn debit(&self, id: &PlayerId, amount: i64) -> Result<i64, Error> {
        self.players
            .debit(id, amount)
            .await?
            .ok_or_else(|| Error::insufficient_funds("not enough coins"))
    }

    /// Add `amount` and return the new balance.
    pub async fn credit(&self, id: &PlayerId, amount: i64) -> Result<i64, Error> {
        self.players
            .credit(id, amount)
            .await?
            .ok_or_else(|| Error::not_found("player not found"))
    }

    /// Return a prior debit.
    pub async fn refund(&self, id: &PlayerId, amount: i64) -> Result<i64, Error> {
        let balance = self.credit(id, amount).await?;
        warn!(player = %id, amount, balance, "debit refunded");
        Ok(balance)
    }
}
