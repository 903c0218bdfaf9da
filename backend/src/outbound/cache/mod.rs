//! In-process catalog cache.
//!
//! Decorates any [`CardCatalog`] with two freshness windows: one for the
//! brief list and one per card detail. Entries are checked on access only;
//! there is no background sweeper. A miss or an expired entry triggers one
//! upstream fetch. On success the stored value is replaced; on failure the
//! error is returned and the previous value stays in place untouched.
//!
//! Stored values are `Arc`s swapped under a lock that is never held across
//! an upstream call, so readers see either the old or the new value.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{CardCatalog, CardCatalogError};
use crate::domain::{BriefCard, CardDetail};

const DEFAULT_BRIEF_LIST_TTL: Duration = Duration::from_secs(6 * 60 * 60);
const DEFAULT_DETAIL_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Freshness windows for cached catalog reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogCacheConfig {
    pub brief_list_ttl: Duration,
    pub detail_ttl: Duration,
}

impl Default for CatalogCacheConfig {
    fn default() -> Self {
        Self {
            brief_list_ttl: DEFAULT_BRIEF_LIST_TTL,
            detail_ttl: DEFAULT_DETAIL_TTL,
        }
    }
}

#[derive(Debug, Clone)]
struct Stamped<T> {
    fetched_at: DateTime<Utc>,
    value: T,
}

impl<T: Clone> Stamped<T> {
    fn fresh_value(&self, now: DateTime<Utc>, ttl: TimeDelta) -> Option<T> {
        (now - self.fetched_at < ttl).then(|| self.value.clone())
    }
}

#[derive(Default)]
struct CacheState {
    brief_list: Option<Stamped<Arc<[BriefCard]>>>,
    details: HashMap<String, Stamped<Arc<CardDetail>>>,
}

/// Caching decorator over an upstream catalog.
pub struct CachedCardCatalog {
    upstream: Arc<dyn CardCatalog>,
    clock: Arc<dyn Clock>,
    brief_list_ttl: TimeDelta,
    detail_ttl: TimeDelta,
    state: RwLock<CacheState>,
}

impl CachedCardCatalog {
    pub fn new(
        upstream: Arc<dyn CardCatalog>,
        clock: Arc<dyn Clock>,
        config: CatalogCacheConfig,
    ) -> Self {
        Self {
            upstream,
            clock,
            brief_list_ttl: to_delta(config.brief_list_ttl),
            detail_ttl: to_delta(config.detail_ttl),
            state: RwLock::new(CacheState::default()),
        }
    }

    fn read_state<R>(&self, read: impl FnOnce(&CacheState) -> R) -> R {
        match self.state.read() {
            Ok(guard) => read(&*guard),
            Err(poisoned) => read(&*poisoned.into_inner()),
        }
    }

    fn write_state(&self, write: impl FnOnce(&mut CacheState)) {
        match self.state.write() {
            Ok(mut guard) => write(&mut *guard),
            Err(poisoned) => write(&mut *poisoned.into_inner()),
        }
    }
}

fn to_delta(duration: Duration) -> TimeDelta {
    TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX)
}

#[async_trait]
impl CardCatalog for CachedCardCatalog {
    async fn brief_list(&self) -> Result<Arc<[BriefCard]>, CardCatalogError> {
        let now = self.clock.utc();
        let cached = self.read_state(|state| {
            state
                .brief_list
                .as_ref()
                .and_then(|entry| entry.fresh_value(now, self.brief_list_ttl))
        });
        if let Some(list) = cached {
            return Ok(list);
        }

        let list = self.upstream.brief_list().await?;
        debug!(entries = list.len(), "catalog brief list refreshed");
        let stored = list.clone();
        self.write_state(|state| {
            state.brief_list = Some(Stamped {
                fetched_at: self.clock.utc(),
                value: stored,
            });
        });
        Ok(list)
    }

    async fn detail(&self, id: &str) -> Result<Arc<CardDetail>, CardCatalogError> {
        let now = self.clock.utc();
        let cached = self.read_state(|state| {
            state
                .details
                .get(id)
                .and_then(|entry| entry.fresh_value(now, self.detail_ttl))
        });
        if let Some(detail) = cached {
            return Ok(detail);
        }

        let detail = self.upstream.detail(id).await?;
        let stored = detail.clone();
        self.write_state(|state| {
            state.details.insert(
                id.to_owned(),
                Stamped {
                    fetched_at: self.clock.utc(),
                    value: stored,
                },
            );
        });
        Ok(detail)
    }
}
