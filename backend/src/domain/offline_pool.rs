//! Static fallback pool of pre-resolved cards.

use serde::Deserialize;
use tracing::warn;

use super::{Card, ImageRef, UniformSource, normalize_image};

const UNKNOWN_SET: &str = "Unknown Set";
const UNKNOWN_RARITY: &str = "Unknown";

/// Raw pool entry as supplied by the offline card source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OfflineCardRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "set")]
    pub set_name: Option<String>,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Immutable set of cards usable without the remote catalog.
///
/// ## Invariants
/// - Every held card has a non-empty display image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfflineCardPool {
    cards: Vec<Card>,
}

impl OfflineCardPool {
    /// Validate records, dropping any without a usable name or image.
    ///
    /// # Examples
    /// ```
    /// use gacha_backend::domain::{OfflineCardPool, OfflineCardRecord};
    ///
    /// let pool = OfflineCardPool::from_records([
    ///     OfflineCardRecord {
    ///         name: "Bulbasaur".into(),
    ///         set_name: Some("Base".into()),
    ///         rarity: None,
    ///         image: Some("https://img.example/base1/44".into()),
    ///     },
    ///     OfflineCardRecord {
    ///         name: "Ghost".into(),
    ///         set_name: None,
    ///         rarity: None,
    ///         image: None,
    ///     },
    /// ]);
    /// assert_eq!(pool.len(), 1);
    /// ```
    pub fn from_records(records: impl IntoIterator<Item = OfflineCardRecord>) -> Self {
        let mut dropped = 0_usize;
        let cards: Vec<Card> = records
            .into_iter()
            .filter_map(|record| {
                let card = card_from_record(record);
                if card.is_none() {
                    dropped += 1;
                }
                card
            })
            .collect();
        if dropped > 0 {
            warn!(dropped, kept = cards.len(), "offline pool entries excluded");
        }
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Pick one card uniformly, consuming one sample when non-empty.
    pub fn pick_random(&self, source: &dyn UniformSource) -> Option<Card> {
        let index = source.pick_index(self.cards.len())?;
        self.cards
            .get(index)
            .filter(|card| !card.image.trim().is_empty())
            .cloned()
    }
}

fn card_from_record(record: OfflineCardRecord) -> Option<Card> {
    let name = record.name.trim();
    if name.is_empty() {
        return None;
    }
    let images = normalize_image(&ImageRef::Url(record.image?))?;
    Some(Card {
        name: name.to_owned(),
        set_name: non_blank(record.set_name).unwrap_or_else(|| UNKNOWN_SET.to_owned()),
        rarity: non_blank(record.rarity).unwrap_or_else(|| UNKNOWN_RARITY.to_owned()),
        image: images.low,
        image_high: images.high,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScriptedUniformSource;
    use rstest::{fixture, rstest};

    fn record(name: &str, image: Option<&str>) -> OfflineCardRecord {
        OfflineCardRecord {
            name: name.to_owned(),
            set_name: Some("Jungle".to_owned()),
            rarity: Some("Common".to_owned()),
            image: image.map(str::to_owned),
        }
    }

    #[fixture]
    fn pool() -> OfflineCardPool {
        OfflineCardPool::from_records([
            record("Scyther", Some("https://img/jungle/10")),
            record("Pinsir", Some("https://img/jungle/9.png")),
            record("Blank", Some("   ")),
            record("Missing", None),
            record("  ", Some("https://img/jungle/1.png")),
        ])
    }

    #[rstest]
    fn load_excludes_entries_without_images(pool: OfflineCardPool) {
        assert_eq!(pool.len(), 2);
    }

    #[rstest]
    fn extensionless_images_gain_resolution_variants(pool: OfflineCardPool) {
        let source = ScriptedUniformSource::new([0.0]);
        let card = pool.pick_random(&source).expect("card");
        assert_eq!(card.name, "Scyther");
        assert_eq!(card.image, "https://img/jungle/10/low.webp");
        assert_eq!(
            card.image_high.as_deref(),
            Some("https://img/jungle/10/high.webp")
        );
    }

    #[rstest]
    fn pick_uses_one_sample(pool: OfflineCardPool) {
        let source = ScriptedUniformSource::new([0.9, 0.1]);
        let card = pool.pick_random(&source).expect("card");
        assert_eq!(card.name, "Pinsir");
        assert_eq!(source.remaining(), 1);
    }

    #[test]
    fn empty_pool_yields_nothing() {
        let source = ScriptedUniformSource::new([0.5]);
        assert_eq!(OfflineCardPool::default().pick_random(&source), None);
        assert_eq!(source.remaining(), 1);
    }

    #[test]
    fn missing_rarity_defaults() {
        let mut entry = record("Mew", Some("https://img/promo/8.png"));
        entry.rarity = None;
        let pool = OfflineCardPool::from_records([entry]);
        let card = pool
            .pick_random(&ScriptedUniformSource::new([0.0]))
            .expect("card");
        assert_eq!(card.rarity, "Unknown");
    }

    #[test]
    fn missing_set_defaults() {
        let mut entry = record("Mew", Some("https://img/promo/8.png"));
        entry.set_name = None;
        let pool = OfflineCardPool::from_records([entry]);
        let card = pool
            .pick_random(&ScriptedUniformSource::new([0.0]))
            .expect("card");
        assert_eq!(card.set_name, "Unknown Set");
    }
}
