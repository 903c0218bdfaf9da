//! JSON shapes shared by several handlers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Card, CollectionEntry, FriendSummary, PullRecord};

/// Card as displayed in collections, history, and pull results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardBody {
    pub name: String,
    pub set: String,
    pub rarity: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_high: Option<String>,
}

impl From<Card> for CardBody {
    fn from(card: Card) -> Self {
        Self {
            name: card.name,
            set: card.set_name,
            rarity: card.rarity,
            image: card.image,
            image_high: card.image_high,
        }
    }
}

/// One merged collection entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionItemBody {
    /// Composite key used to sell this entry.
    pub key: String,
    #[serde(flatten)]
    pub card: CardBody,
    pub grade: u8,
    pub mint: bool,
    pub count: i64,
    pub last_at: DateTime<Utc>,
}

impl From<CollectionEntry> for CollectionItemBody {
    fn from(entry: CollectionEntry) -> Self {
        Self {
            key: entry.key.to_string(),
            card: entry.card.into(),
            grade: entry.grade.value(),
            mint: entry.mint,
            count: entry.count,
            last_at: entry.last_at,
        }
    }
}

/// One pull history row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItemBody {
    #[serde(flatten)]
    pub card: CardBody,
    pub grade: u8,
    pub mint: bool,
    pub pulled_at: DateTime<Utc>,
}

impl From<PullRecord> for HistoryItemBody {
    fn from(pull: PullRecord) -> Self {
        Self {
            card: pull.card.into(),
            grade: pull.grade.value(),
            mint: pull.mint,
            pulled_at: pull.pulled_at,
        }
    }
}

/// Public view of a followed player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FriendBody {
    pub name: String,
    pub friend_code: String,
    pub since: DateTime<Utc>,
}

impl From<FriendSummary> for FriendBody {
    fn from(friend: FriendSummary) -> Self {
        Self {
            name: friend.name.to_string(),
            friend_code: friend.friend_code.to_string(),
            since: friend.since,
        }
    }
}
