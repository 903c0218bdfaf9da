//! Collection entries, pull history, and the merge rule joining them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::{Card, CardKeyDigest, Grade, GradeBand, PlayerId};

/// One acquisition as appended to the pull history.
#[derive(Debug, Clone, PartialEq)]
pub struct PullRecord {
    pub player_id: PlayerId,
    pub card: Card,
    pub grade: Grade,
    pub mint: bool,
    pub pulled_at: DateTime<Utc>,
}

/// Merged holding of one card in a player's collection.
///
/// ## Invariants
/// - `count >= 1` while the entry exists.
/// - `grade` never decreases and `mint` never reverts under [`Self::merge`].
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionEntry {
    pub key: CardKeyDigest,
    pub card: Card,
    pub grade: Grade,
    pub mint: bool,
    pub count: i64,
    pub last_at: DateTime<Utc>,
}

impl CollectionEntry {
    /// Entry created by the first pull of a card.
    pub fn first_pull(pull: &PullRecord) -> Self {
        Self {
            key: pull.card.key().digest(),
            card: pull.card.clone(),
            grade: pull.grade,
            mint: pull.mint,
            count: 1,
            last_at: pull.pulled_at,
        }
    }

    /// Fold a repeated pull of the same card into this entry.
    pub fn merge(&mut self, pull: &PullRecord) {
        self.count = self.count.saturating_add(1);
        self.grade = self.grade.max(pull.grade);
        self.mint |= pull.mint;
        self.last_at = pull.pulled_at;
    }
}

/// Aggregate statistics over a player's pull history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PullStats {
    pub total: u64,
    pub mint: u64,
    /// Grade 10 pulls.
    pub gem: u64,
    /// Grade 8 and 9 pulls.
    pub high: u64,
    /// Grade 5 to 7 pulls.
    pub mid: u64,
    /// Grade 1 to 4 pulls.
    pub low: u64,
}

impl PullStats {
    /// Count one pull.
    pub fn record(&mut self, grade: Grade, mint: bool) {
        self.record_many(grade, mint, 1);
    }

    /// Count `pulls` pulls sharing one grade and mint flag.
    pub fn record_many(&mut self, grade: Grade, mint: bool, pulls: u64) {
        self.total += pulls;
        if mint {
            self.mint += pulls;
        }
        let band = match grade.band() {
            GradeBand::Gem => &mut self.gem,
            GradeBand::High => &mut self.high,
            GradeBand::Mid => &mut self.mid,
            GradeBand::Low => &mut self.low,
        };
        *band += pulls;
    }
}

impl FromIterator<(Grade, bool)> for PullStats {
    fn from_iter<T: IntoIterator<Item = (Grade, bool)>>(iter: T) -> Self {
        let mut stats = Self::default();
        for (grade, mint) in iter {
            stats.record(grade, mint);
        }
        stats
    }
}

/// Result of removing one copy of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleOutcome {
    /// The entry held more than one copy; this many remain.
    Decremented { remaining: i64 },
    /// The last copy was sold and the entry removed.
    Removed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use rstest::{fixture, rstest};

    fn grade(value: i64) -> Grade {
        Grade::new(value).expect("valid grade")
    }

    #[fixture]
    fn card() -> Card {
        Card {
            name: "Charizard".to_owned(),
            set_name: "Base".to_owned(),
            rarity: "Rare Holo".to_owned(),
            image: "https://img/base/4/low.webp".to_owned(),
            image_high: Some("https://img/base/4/high.webp".to_owned()),
        }
    }

    fn pull(card: &Card, grade_value: i64, mint: bool, minutes: i64) -> PullRecord {
        PullRecord {
            player_id: PlayerId::from_uuid(uuid::Uuid::nil()),
            card: card.clone(),
            grade: grade(grade_value),
            mint,
            pulled_at: DateTime::<Utc>::UNIX_EPOCH + TimeDelta::minutes(minutes),
        }
    }

    #[rstest]
    fn merging_keeps_best_grade_and_sticky_mint(card: Card) {
        let mut entry = CollectionEntry::first_pull(&pull(&card, 10, true, 0));
        entry.merge(&pull(&card, 3, false, 5));

        assert_eq!(entry.count, 2);
        assert_eq!(entry.grade, grade(10));
        assert!(entry.mint);
        assert_eq!(entry.last_at, pull(&card, 3, false, 5).pulled_at);
    }

    #[rstest]
    fn merging_upgrades_grade(card: Card) {
        let mut entry = CollectionEntry::first_pull(&pull(&card, 4, false, 0));
        entry.merge(&pull(&card, 7, false, 1));
        assert_eq!(entry.grade, grade(7));
        assert!(!entry.mint);
        assert_eq!(entry.key, card.key().digest());
    }

    #[test]
    fn stats_bucket_grades_into_bands() {
        let stats: PullStats = [
            (grade(10), true),
            (grade(10), false),
            (grade(9), false),
            (grade(6), false),
            (grade(1), false),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            stats,
            PullStats {
                total: 5,
                mint: 1,
                gem: 2,
                high: 1,
                mid: 1,
                low: 1,
            }
        );
    }
}
