//! Profile handler.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::Profile;
use crate::domain::{Error, PullStats};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::CurrentPlayer;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsBody {
    pub total: u64,
    pub mint: u64,
    pub gem: u64,
    pub high: u64,
    pub mid: u64,
    pub low: u64,
}

impl From<PullStats> for StatsBody {
    fn from(stats: PullStats) -> Self {
        Self {
            total: stats.total,
            mint: stats.mint,
            gem: stats.gem,
            high: stats.high,
            mid: stats.mid,
            low: stats.low,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub name: String,
    pub friend_code: String,
    pub balance: i64,
    pub stats: StatsBody,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            name: profile.name.to_string(),
            friend_code: profile.friend_code.to_string(),
            balance: profile.balance,
            stats: profile.stats.into(),
        }
    }
}

/// Name, settled balance, and pull statistics for the caller.
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "getProfile"
)]
#[get("/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    player: CurrentPlayer,
) -> ApiResult<web::Json<ProfileResponse>> {
    let profile = state.profile.profile(&player.0.id).await?;
    Ok(web::Json(profile.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FriendCode, PlayerName};
    use crate::inbound::http::test_utils::{MockPorts, bearer, test_app, test_player};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;

    #[actix_web::test]
    async fn returns_settled_profile_for_caller() {
        let player = test_player("Misty", "MSTYW234", 35);
        let id = player.id;
        let mut ports = MockPorts::default();
        ports.authenticate_as(player);
        ports
            .profile
            .expect_profile()
            .withf(move |requested| *requested == id)
            .times(1)
            .returning(|_| {
                Ok(Profile {
                    name: PlayerName::new("Misty").expect("name"),
                    friend_code: FriendCode::parse("MSTYW234").expect("code"),
                    balance: 35,
                    stats: PullStats {
                        total: 4,
                        mint: 1,
                        gem: 1,
                        high: 0,
                        mid: 2,
                        low: 1,
                    },
                })
            });
        let app = actix_test::init_service(test_app(ports.into_state(), |cfg| {
            cfg.service(get_profile);
        }))
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/api/v1/profile")
            .insert_header(bearer())
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: ProfileResponse = actix_test::read_body_json(res).await;
        assert_eq!(body.balance, 35);
        assert_eq!(body.friend_code, "MSTYW234");
        assert_eq!(body.stats.total, 4);
        assert_eq!(body.stats.gem, 1);
    }

    #[actix_web::test]
    async fn requires_login() {
        let app = actix_test::init_service(test_app(MockPorts::default().into_state(), |cfg| {
            cfg.service(get_profile);
        }))
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/profile").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
