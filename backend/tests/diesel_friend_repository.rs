//! `DieselFriendRepository` against embedded PostgreSQL.

#[path = "support/pg_embed.rs"]
mod pg_embed;

use gacha_backend::domain::ports::{FriendRepository, PlayerRepository};
use gacha_backend::outbound::persistence::{DieselFriendRepository, DieselPlayerRepository};
use rstest::rstest;

use pg_embed::{at_minute, new_player, store_context};

#[rstest]
fn edges_are_directed_and_inserted_once() {
    let Some(ctx) = store_context() else { return };
    let players = DieselPlayerRepository::new(ctx.pool());
    let friends = DieselFriendRepository::new(ctx.pool());
    let owner = new_player("Dawn", "TWNLF24X");
    let friend = new_player("Barry", "SNDGEM35");

    ctx.block_on(async {
        players.create(&owner).await.expect("create owner");
        players.create(&friend).await.expect("create friend");

        let added = friends
            .add_edge(&owner.id, &friend.id, at_minute(1))
            .await
            .expect("add");
        assert!(added);
        let again = friends
            .add_edge(&owner.id, &friend.id, at_minute(2))
            .await
            .expect("re-add");
        assert!(!again);

        assert!(friends.has_edge(&owner.id, &friend.id).await.expect("edge"));
        assert!(!friends.has_edge(&friend.id, &owner.id).await.expect("edge"));

        let listed = friends.list_friends(&owner.id).await.expect("list");
        let [summary] = listed.as_slice() else {
            panic!("expected one friend, got {listed:?}");
        };
        assert_eq!(summary.player_id, friend.id);
        assert_eq!(summary.name, friend.name);
        assert_eq!(summary.friend_code, friend.friend_code);
        assert_eq!(summary.since, at_minute(1));

        let reverse = friends.list_friends(&friend.id).await.expect("list");
        assert!(reverse.is_empty());
    });
}
