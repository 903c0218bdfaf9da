//! Driven port for the remote card catalog.
//!
//! The resolver only needs two reads: the brief list of all cards and the
//! detail record of one card. Adapters own transport, decoding, and caching.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{BriefCard, CardDetail};

use super::define_port_error;

define_port_error! {
    /// Failures surfaced by catalog adapters.
    pub enum CardCatalogError {
        /// The request could not be sent or the connection dropped.
        Transport { message: String } => "catalog transport failed: {message}",
        /// The request exceeded its deadline.
        Timeout { message: String } => "catalog request timed out: {message}",
        /// The catalog answered with a non-success status.
        Status { status: u16 } => "catalog responded with status {status}",
        /// The response body did not match the expected shape.
        Decode { message: String } => "catalog response decode failed: {message}",
        /// Remote access is switched off for this process.
        Disabled => "remote catalog access is disabled",
    }
}

impl CardCatalogError {
    /// Whether another try might succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

/// Read access to the card catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardCatalog: Send + Sync {
    /// Ordered list of brief card descriptors.
    async fn brief_list(&self) -> Result<Arc<[BriefCard]>, CardCatalogError>;

    /// Full record for the card with `id`.
    async fn detail(&self, id: &str) -> Result<Arc<CardDetail>, CardCatalogError>;
}

/// Catalog used when the process runs in forced-offline mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledCardCatalog;

#[async_trait]
impl CardCatalog for DisabledCardCatalog {
    async fn brief_list(&self) -> Result<Arc<[BriefCard]>, CardCatalogError> {
        Err(CardCatalogError::disabled())
    }

    async fn detail(&self, _id: &str) -> Result<Arc<CardDetail>, CardCatalogError> {
        Err(CardCatalogError::disabled())
    }
}
