//! Behaviour of the in-memory store against the port contracts.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    AccrualUpdate, CollectionRepository, FriendRepository, PlayerRepository,
    PlayerRepositoryError,
};
use crate::domain::{
    AccessCode, Card, FriendCode, Grade, NewPlayer, PlayerName, SaleOutcome,
};

fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
        + TimeDelta::minutes(minutes)
}

fn new_player(name: &str, friend_code: &str) -> NewPlayer {
    NewPlayer {
        id: PlayerId::random(),
        name: PlayerName::new(name).expect("valid name"),
        access_code_hash: AccessCode::new("ABC234").expect("valid code").hash(),
        friend_code: FriendCode::parse(friend_code).expect("valid friend code"),
        session_token: SessionToken::issue(),
        balance: 20,
        created_at: at(0),
    }
}

fn card(name: &str) -> Card {
    Card {
        name: name.to_owned(),
        set_name: "Base".to_owned(),
        rarity: "Common".to_owned(),
        image: format!("https://img/base/{name}/low.webp"),
        image_high: None,
    }
}

fn pull(player: PlayerId, card: &Card, grade: i64, mint: bool, minutes: i64) -> PullRecord {
    PullRecord {
        player_id: player,
        card: card.clone(),
        grade: Grade::new(grade).expect("valid grade"),
        mint,
        pulled_at: at(minutes),
    }
}

#[fixture]
fn store() -> InMemoryStore {
    InMemoryStore::new()
}

#[rstest]
#[tokio::test]
async fn create_rejects_duplicate_name_and_friend_code(store: InMemoryStore) {
    store
        .create(&new_player("Misty", "MSTYW234"))
        .await
        .expect("first account");

    let same_name = store.create(&new_player("Misty", "BRCKW234")).await;
    assert!(matches!(
        same_name,
        Err(PlayerRepositoryError::DuplicateName { .. })
    ));

    let same_code = store.create(&new_player("Brock", "MSTYW234")).await;
    assert_eq!(same_code, Err(PlayerRepositoryError::DuplicateFriendCode));
}

#[rstest]
#[tokio::test]
async fn sessions_are_replaced_not_accumulated(store: InMemoryStore) {
    let new = new_player("Misty", "MSTYW234");
    store.create(&new).await.expect("account");
    let next = SessionToken::issue();

    store.replace_session(&new.id, &next).await.expect("replace");

    assert!(
        store
            .find_by_session(&new.session_token)
            .await
            .expect("lookup")
            .is_none()
    );
    let found = store.find_by_session(&next).await.expect("lookup");
    assert_eq!(found.map(|player| player.id), Some(new.id));
}

#[rstest]
#[tokio::test]
async fn accrual_applies_only_against_expected_timestamp(store: InMemoryStore) {
    let new = new_player("Misty", "MSTYW234");
    store.create(&new).await.expect("account");
    let update = AccrualUpdate {
        expected_last_accrual_at: at(0),
        credit: 20,
        last_accrual_at: at(10),
    };

    let applied = store
        .apply_accrual(&new.id, update)
        .await
        .expect("apply")
        .expect("timestamp matched");
    assert_eq!(applied.balance, 40);
    assert_eq!(applied.last_accrual_at, at(10));

    let replay = store.apply_accrual(&new.id, update).await.expect("apply");
    assert_eq!(replay, None);
    let player = store.find_by_id(&new.id).await.expect("find").expect("exists");
    assert_eq!(player.balance, 40);
}

#[rstest]
#[tokio::test]
async fn debit_never_drives_balance_negative(store: InMemoryStore) {
    let new = new_player("Misty", "MSTYW234");
    store.create(&new).await.expect("account");

    assert_eq!(store.debit(&new.id, 15).await.expect("debit"), Some(5));
    assert_eq!(store.debit(&new.id, 6).await.expect("debit"), None);
    assert_eq!(store.credit(&new.id, 1).await.expect("credit"), Some(6));
    assert_eq!(store.debit(&PlayerId::random(), 1).await.expect("debit"), None);
}

#[rstest]
#[tokio::test]
async fn repeated_pulls_merge_into_one_entry(store: InMemoryStore) {
    let player = PlayerId::random();
    let abra = card("Abra");

    store
        .record_pull(&pull(player, &abra, 10, true, 1))
        .await
        .expect("first pull");
    let merged = store
        .record_pull(&pull(player, &abra, 6, false, 2))
        .await
        .expect("second pull");

    assert_eq!(merged.count, 2);
    assert_eq!(merged.grade.value(), 10);
    assert!(merged.mint);
    assert_eq!(merged.last_at, at(2));
    assert_eq!(store.list_collection(&player).await.expect("list").len(), 1);
    assert_eq!(store.list_history(&player, 80).await.expect("history").len(), 2);
}

#[rstest]
#[tokio::test]
async fn collection_and_history_are_newest_first(store: InMemoryStore) {
    let player = PlayerId::random();
    let other = PlayerId::random();
    for (minute, name) in ["Abra", "Gastly", "Onix"].into_iter().enumerate() {
        let minute = i64::try_from(minute).expect("small index");
        store
            .record_pull(&pull(player, &card(name), 5, false, minute))
            .await
            .expect("pull");
    }
    store
        .record_pull(&pull(other, &card("Zubat"), 5, false, 9))
        .await
        .expect("other pull");

    let names: Vec<String> = store
        .list_collection(&player)
        .await
        .expect("list")
        .into_iter()
        .map(|entry| entry.card.name)
        .collect();
    assert_eq!(names, ["Onix", "Gastly", "Abra"]);

    let history = store.list_history(&player, 2).await.expect("history");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].card.name, "Onix");

    let stats = store.pull_stats(&player).await.expect("stats");
    assert_eq!(stats.total, 3);
    assert_eq!(stats.mid, 3);
}

#[rstest]
#[tokio::test]
async fn removing_decrements_then_deletes(store: InMemoryStore) {
    let player = PlayerId::random();
    let abra = card("Abra");
    let key = abra.key().digest();
    for minute in 0..2 {
        store
            .record_pull(&pull(player, &abra, 3, false, minute))
            .await
            .expect("pull");
    }

    assert_eq!(
        store.remove_one(&player, &key).await.expect("remove"),
        Some(SaleOutcome::Decremented { remaining: 1 })
    );
    assert_eq!(
        store.remove_one(&player, &key).await.expect("remove"),
        Some(SaleOutcome::Removed)
    );
    assert_eq!(store.remove_one(&player, &key).await.expect("remove"), None);
    assert!(store.list_collection(&player).await.expect("list").is_empty());
}

#[rstest]
#[tokio::test]
async fn friend_edges_are_directed_and_deduplicated(store: InMemoryStore) {
    let misty = new_player("Misty", "MSTYW234");
    let brock = new_player("Brock", "BRCKW234");
    store.create(&misty).await.expect("misty");
    store.create(&brock).await.expect("brock");

    assert!(store.add_edge(&misty.id, &brock.id, at(5)).await.expect("add"));
    assert!(!store.add_edge(&misty.id, &brock.id, at(6)).await.expect("re-add"));

    assert!(store.has_edge(&misty.id, &brock.id).await.expect("edge"));
    assert!(!store.has_edge(&brock.id, &misty.id).await.expect("reverse edge"));

    let friends = store.list_friends(&misty.id).await.expect("friends");
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0].name.as_ref(), "Brock");
    assert_eq!(friends[0].since, at(5));
}
