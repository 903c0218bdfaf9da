//! Driving port for buying a single pull.

use async_trait::async_trait;

use crate::domain::{Card, CardKeyDigest, CardOrigin, Error, Grade, PlayerId};

/// A completed purchase.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseReceipt {
    /// Balance after the debit.
    pub balance: i64,
    pub card: Card,
    pub key: CardKeyDigest,
    pub grade: Grade,
    pub mint: bool,
    /// Which source produced the card.
    pub origin: CardOrigin,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PurchaseCommand: Send + Sync {
    /// Debit one pull, draw and grade a card, and record it.
    ///
    /// On failure after the debit, the debit is refunded before the error
    /// is returned.
    async fn purchase_one(&self, player: &PlayerId) -> Result<PurchaseReceipt, Error>;
}
