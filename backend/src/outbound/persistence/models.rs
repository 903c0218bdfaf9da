//! Internal Diesel row structs.
//!
//! Rows never leave the persistence layer. Conversions back into domain
//! types revalidate stored values and report corrupt rows as strings that
//! the repositories wrap in query errors.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    AccessCodeHash, Card, CardKeyDigest, CollectionEntry, FriendCode, Grade, NewPlayer, Player,
    PlayerId, PlayerName, PullRecord,
};

use super::schema::{collection_entries, friends, players, pulls};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = players)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(super) struct PlayerRow {
    pub id: Uuid,
    pub name: String,
    pub access_code_hash: String,
    pub friend_code: String,
    pub balance: i64,
    pub last_accrual_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<PlayerRow> for Player {
    type Error = String;

    fn try_from(row: PlayerRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PlayerId::from_uuid(row.id),
            name: PlayerName::new(&row.name).map_err(|err| format!("stored name: {err}"))?,
            access_code_hash: AccessCodeHash::from_stored(row.access_code_hash),
            friend_code: FriendCode::parse(&row.friend_code)
                .map_err(|err| format!("stored friend code: {err}"))?,
            balance: row.balance,
            last_accrual_at: row.last_accrual_at,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = players)]
pub(super) struct NewPlayerRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub access_code_hash: &'a str,
    pub friend_code: &'a str,
    pub session_token: &'a str,
    pub balance: i64,
    pub last_accrual_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a NewPlayer> for NewPlayerRow<'a> {
    fn from(player: &'a NewPlayer) -> Self {
        Self {
            id: *player.id.as_uuid(),
            name: player.name.as_ref(),
            access_code_hash: player.access_code_hash.as_ref(),
            friend_code: player.friend_code.as_ref(),
            session_token: player.session_token.as_ref(),
            balance: player.balance,
            last_accrual_at: player.created_at,
            created_at: player.created_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = collection_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(super) struct CollectionEntryRow {
    pub card_key: String,
    pub name: String,
    pub set_name: String,
    pub rarity: String,
    pub image: String,
    pub image_high: Option<String>,
    pub grade: i16,
    pub mint: bool,
    pub count: i64,
    pub last_at: DateTime<Utc>,
}

impl TryFrom<CollectionEntryRow> for CollectionEntry {
    type Error = String;

    fn try_from(row: CollectionEntryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            key: CardKeyDigest::parse(&row.card_key)
                .map_err(|err| format!("stored card key: {err}"))?,
            grade: stored_grade(row.grade)?,
            card: Card {
                name: row.name,
                set_name: row.set_name,
                rarity: row.rarity,
                image: row.image,
                image_high: row.image_high,
            },
            mint: row.mint,
            count: row.count,
            last_at: row.last_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = collection_entries)]
pub(super) struct NewCollectionEntryRow<'a> {
    pub player_id: Uuid,
    pub card_key: &'a str,
    pub name: &'a str,
    pub set_name: &'a str,
    pub rarity: &'a str,
    pub image: &'a str,
    pub image_high: Option<&'a str>,
    pub grade: i16,
    pub mint: bool,
    pub count: i64,
    pub last_at: DateTime<Utc>,
}

impl<'a> NewCollectionEntryRow<'a> {
    pub fn first_pull(pull: &'a PullRecord, card_key: &'a CardKeyDigest) -> Self {
        Self {
            player_id: *pull.player_id.as_uuid(),
            card_key: card_key.as_ref(),
            name: &pull.card.name,
            set_name: &pull.card.set_name,
            rarity: &pull.card.rarity,
            image: &pull.card.image,
            image_high: pull.card.image_high.as_deref(),
            grade: i16::from(pull.grade.value()),
            mint: pull.mint,
            count: 1,
            last_at: pull.pulled_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pulls)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(super) struct PullRow {
    pub player_id: Uuid,
    pub name: String,
    pub set_name: String,
    pub rarity: String,
    pub image: String,
    pub image_high: Option<String>,
    pub grade: i16,
    pub mint: bool,
    pub pulled_at: DateTime<Utc>,
}

impl TryFrom<PullRow> for PullRecord {
    type Error = String;

    fn try_from(row: PullRow) -> Result<Self, Self::Error> {
        Ok(Self {
            player_id: PlayerId::from_uuid(row.player_id),
            grade: stored_grade(row.grade)?,
            card: Card {
                name: row.name,
                set_name: row.set_name,
                rarity: row.rarity,
                image: row.image,
                image_high: row.image_high,
            },
            mint: row.mint,
            pulled_at: row.pulled_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = pulls)]
pub(super) struct NewPullRow<'a> {
    pub player_id: Uuid,
    pub name: &'a str,
    pub set_name: &'a str,
    pub rarity: &'a str,
    pub image: &'a str,
    pub image_high: Option<&'a str>,
    pub grade: i16,
    pub mint: bool,
    pub pulled_at: DateTime<Utc>,
}

impl<'a> From<&'a PullRecord> for NewPullRow<'a> {
    fn from(pull: &'a PullRecord) -> Self {
        Self {
            player_id: *pull.player_id.as_uuid(),
            name: &pull.card.name,
            set_name: &pull.card.set_name,
            rarity: &pull.card.rarity,
            image: &pull.card.image,
            image_high: pull.card.image_high.as_deref(),
            grade: i16::from(pull.grade.value()),
            mint: pull.mint,
            pulled_at: pull.pulled_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = friends)]
pub(super) struct NewFriendRow {
    pub owner_id: Uuid,
    pub friend_id: Uuid,
    pub created_at: DateTime<Utc>,
}

pub(super) fn stored_grade(value: i16) -> Result<Grade, String> {
    Grade::new(i64::from(value)).map_err(|err| format!("stored grade: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, true)]
    #[case(10, true)]
    #[case(0, false)]
    #[case(11, false)]
    fn stored_grades_are_revalidated(#[case] value: i16, #[case] valid: bool) {
        assert_eq!(stored_grade(value).is_ok(), valid);
    }

    #[rstest]
    fn corrupt_friend_code_is_rejected() {
        let row = PlayerRow {
            id: Uuid::nil(),
            name: "Misty".to_owned(),
            access_code_hash: "00".repeat(32),
            friend_code: "lower-case!".to_owned(),
            balance: 0,
            last_accrual_at: DateTime::<Utc>::UNIX_EPOCH,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        };
        let error = Player::try_from(row).expect_err("invalid code");
        assert!(error.contains("friend code"));
    }
}
