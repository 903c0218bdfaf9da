//! Card resolver: remote catalog with bounded tries, then the offline pool.
//!
//! In hybrid mode each try fetches the brief list, picks one entry, fetches
//! its detail, and normalises the image. A failed try is skipped; the loop
//! stops early on success or when the catalog reports it is disabled. Once
//! the tries are spent, one draw from the offline pool is made. Forced-offline
//! mode goes straight to the pool.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::ports::CardCatalog;
use crate::domain::{
    BriefCard, Card, CardDetail, Error, OfflineCardPool, UniformSource, normalize_image,
};

mod try_outcome;

use try_outcome::{SkipReason, TryOutcome, detail_failure, list_failure};

const UNKNOWN_SET: &str = "Unknown Set";
const UNKNOWN_RARITY: &str = "Unknown";
const DEFAULT_MAX_TRIES: u32 = 6;

/// Which sources the resolver may draw from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceMode {
    /// Remote catalog first, offline pool as last resort.
    #[default]
    Hybrid,
    /// Offline pool only.
    OfflineOnly,
}

/// Resolver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardResolverConfig {
    pub mode: SourceMode,
    /// Remote tries before falling back; at least one is always made.
    pub max_tries: u32,
}

impl Default for CardResolverConfig {
    fn default() -> Self {
        Self {
            mode: SourceMode::Hybrid,
            max_tries: DEFAULT_MAX_TRIES,
        }
    }
}

/// Source that produced a drawn card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardOrigin {
    Catalog,
    OfflinePool,
}

impl CardOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::OfflinePool => "offline_pool",
        }
    }
}

/// Card produced by [`CardResolver::draw_card`].
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnCard {
    pub card: Card,
    pub origin: CardOrigin,
    /// Remote tries consumed before the card was produced.
    pub tries: u32,
}

/// Draws normalised cards from the catalog and the offline pool.
pub struct CardResolver {
    catalog: Arc<dyn CardCatalog>,
    pool: Arc<OfflineCardPool>,
    random: Arc<dyn UniformSource>,
    config: CardResolverConfig,
}

impl CardResolver {
    pub fn new(
        catalog: Arc<dyn CardCatalog>,
        pool: Arc<OfflineCardPool>,
        random: Arc<dyn UniformSource>,
        config: CardResolverConfig,
    ) -> Self {
        Self {
            catalog,
            pool,
            random,
            config,
        }
    }

    pub fn config(&self) -> CardResolverConfig {
        self.config
    }

    /// Produce one card or fail with `no_card_available`.
    pub async fn draw_card(&self) -> Result<DrawnCard, Error> {
        if self.config.mode == SourceMode::OfflineOnly {
            return self.draw_offline(0);
        }

        let max_tries = self.config.max_tries.max(1);
        let mut tries = 0;
        while tries < max_tries {
            tries += 1;
            match self.run_single_try().await {
                TryOutcome::Drawn(card) => {
                    debug!(attempt = tries, card = %card.name, "catalog draw succeeded");
                    return Ok(DrawnCard {
                        card,
                        origin: CardOrigin::Catalog,
                        tries,
                    });
                }
                TryOutcome::Skip(reason) => {
                    debug!(
                        attempt = tries,
                        reason = reason.label(),
                        detail = ?reason,
                        "catalog draw try skipped"
                    );
                }
                TryOutcome::Abort(error) => {
                    debug!(attempt = tries, error = %error, "catalog draw aborted");
                    break;
                }
            }
        }

        warn!(tries, "catalog draws exhausted; falling back to offline pool");
        self.draw_offline(tries)
    }

    async fn run_single_try(&self) -> TryOutcome {
        let list = match self.catalog.brief_list().await {
            Ok(list) => list,
            Err(error) => return list_failure(error),
        };
        let Some(entry) = self
            .random
            .pick_index(list.len())
            .and_then(|index| list.get(index))
        else {
            return TryOutcome::Skip(SkipReason::EmptyList);
        };
        let Some(id) = entry
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
        else {
            return TryOutcome::Skip(SkipReason::MissingId);
        };
        let detail = match self.catalog.detail(id).await {
            Ok(detail) => detail,
            Err(error) => return detail_failure(error),
        };
        card_from_detail(entry, &detail)
    }

    fn draw_offline(&self, tries: u32) -> Result<DrawnCard, Error> {
        match self.pool.pick_random(self.random.as_ref()) {
            Some(card) => Ok(DrawnCard {
                card,
                origin: CardOrigin::OfflinePool,
                tries,
            }),
            None => {
                warn!(pool_size = self.pool.len(), "offline pool produced no card");
                Err(Error::no_card_available(
                    "no card is available right now; please try again",
                ))
            }
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn card_from_detail(entry: &BriefCard, detail: &CardDetail) -> TryOutcome {
    let Some(name) = non_blank(detail.name.as_deref()).or(non_blank(entry.name.as_deref())) else {
        return TryOutcome::Skip(SkipReason::MissingName);
    };
    let Some(images) = detail.image.as_ref().and_then(normalize_image) else {
        return TryOutcome::Skip(SkipReason::NoUsableImage);
    };
    TryOutcome::Drawn(Card {
        name: name.to_owned(),
        set_name: non_blank(detail.set_name.as_deref())
            .unwrap_or(UNKNOWN_SET)
            .to_owned(),
        rarity: non_blank(detail.rarity.as_deref())
            .unwrap_or(UNKNOWN_RARITY)
            .to_owned(),
        image: images.low,
        image_high: images.high,
    })
}
