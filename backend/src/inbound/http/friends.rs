//! Friend handlers.
//!
//! ```text
//! POST /api/v1/friends {"friendCode":"BRCKW234"}
//! GET  /api/v1/friends
//! GET  /api/v1/friends/BRCKW234/collection
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, FriendCode};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{CollectionItemBody, FriendBody};
use crate::inbound::http::session::CurrentPlayer;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::invalid_field;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddFriendBody {
    pub friend_code: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddFriendResponse {
    pub friend: FriendBody,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FriendsResponse {
    pub friends: Vec<FriendBody>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FriendCollectionResponse {
    pub items: Vec<CollectionItemBody>,
}

fn parse_friend_code(raw: &str) -> Result<FriendCode, Error> {
    FriendCode::parse(raw).map_err(|err| invalid_field("friendCode", err))
}

/// Follow another player by friend code. Re-adding is a no-op.
#[utoipa::path(
    post,
    path = "/api/v1/friends",
    request_body = AddFriendBody,
    responses(
        (status = 200, description = "Friend added", body = AddFriendResponse),
        (status = 400, description = "Malformed code or own code", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No player with that code", body = Error)
    ),
    tags = ["friends"],
    operation_id = "addFriend"
)]
#[post("/friends")]
pub async fn add_friend(
    state: web::Data<HttpState>,
    player: CurrentPlayer,
    payload: web::Json<AddFriendBody>,
) -> ApiResult<web::Json<AddFriendResponse>> {
    let code = parse_friend_code(&payload.friend_code)?;
    let friend = state.friends.add_friend(&player.0.id, &code).await?;
    Ok(web::Json(AddFriendResponse {
        friend: friend.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/friends",
    responses(
        (status = 200, description = "Followed players, oldest first", body = FriendsResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["friends"],
    operation_id = "listFriends"
)]
#[get("/friends")]
pub async fn list_friends(
    state: web::Data<HttpState>,
    player: CurrentPlayer,
) -> ApiResult<web::Json<FriendsResponse>> {
    let friends = state.friends.list_friends(&player.0.id).await?;
    Ok(web::Json(FriendsResponse {
        friends: friends.into_iter().map(Into::into).collect(),
    }))
}

/// Read a followed player's collection.
#[utoipa::path(
    get,
    path = "/api/v1/friends/{friendCode}/collection",
    params(("friendCode" = String, Path, description = "Friend code of the owner")),
    responses(
        (status = 200, description = "Friend's collection", body = FriendCollectionResponse),
        (status = 400, description = "Malformed code", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not following this player", body = Error),
        (status = 404, description = "No player with that code", body = Error)
    ),
    tags = ["friends"],
    operation_id = "listFriendCollection"
)]
#[get("/friends/{friend_code}/collection")]
pub async fn list_friend_collection(
    state: web::Data<HttpState>,
    player: CurrentPlayer,
    path: web::Path<String>,
) -> ApiResult<web::Json<FriendCollectionResponse>> {
    let code = parse_friend_code(&path.into_inner())?;
    let items = state.friends.friend_collection(&player.0.id, &code).await?;
    Ok(web::Json(FriendCollectionResponse {
        items: items.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, FriendSummary, PlayerId, PlayerName};
    use crate::inbound::http::test_utils::{
        MockPorts, bearer, fixed_time, test_app, test_player,
    };
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::json;

    fn brock() -> FriendSummary {
        FriendSummary {
            player_id: PlayerId::random(),
            name: PlayerName::new("Brock").expect("name"),
            friend_code: FriendCode::parse("BRCKW234").expect("code"),
            since: fixed_time(),
        }
    }

    fn routes(cfg: &mut web::ServiceConfig) {
        cfg.service(add_friend)
            .service(list_friends)
            .service(list_friend_collection);
    }

    fn authenticated() -> MockPorts {
        let mut ports = MockPorts::default();
        ports.authenticate_as(test_player("Misty", "MSTYW234", 20));
        ports
    }

    #[actix_web::test]
    async fn add_friend_normalises_code() {
        let mut ports = authenticated();
        ports
            .friends
            .expect_add_friend()
            .withf(|_, code| code.as_ref() == "BRCKW234")
            .times(1)
            .returning(|_, _| Ok(brock()));
        let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/friends")
            .insert_header(bearer())
            .set_json(json!({"friendCode": "brckw234"}))
            .to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["friend"]["name"], "Brock");
        assert_eq!(body["friend"]["friendCode"], "BRCKW234");
    }

    #[actix_web::test]
    async fn lists_friends() {
        let mut ports = authenticated();
        ports
            .friends
            .expect_list_friends()
            .returning(|_| Ok(vec![brock()]));
        let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;

        let req = actix_test::TestRequest::get()
            .uri("/api/v1/friends")
            .insert_header(bearer())
            .to_request();
        let body: FriendsResponse = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.friends.len(), 1);
        assert_eq!(body.friends[0].since, fixed_time());
    }

    #[rstest]
    #[case::malformed("O0O0O0O0", StatusCode::BAD_REQUEST, ErrorCode::InvalidRequest)]
    #[case::not_following("BRCKW234", StatusCode::FORBIDDEN, ErrorCode::Forbidden)]
    #[actix_web::test]
    async fn friend_collection_rejections(
        #[case] code: &str,
        #[case] status: StatusCode,
        #[case] expected: ErrorCode,
    ) {
        let mut ports = authenticated();
        ports
            .friends
            .expect_friend_collection()
            .returning(|_, _| Err(Error::forbidden("add this player as a friend first")));
        let app = actix_test::init_service(test_app(ports.into_state(), routes)).await;

        let req = actix_test::TestRequest::get()
            .uri(&format!("/api/v1/friends/{code}/collection"))
            .insert_header(bearer())
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), status);
        let body: Error = actix_test::read_body_json(res).await;
        assert_eq!(body.code(), expected);
    }
}
