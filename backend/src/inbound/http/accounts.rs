//! Login handler.
//!
//! ```text
//! POST /api/v1/login {"name":"Misty","code":"K7QX2M"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{LoginOutcome, LoginRequest};
use crate::domain::{AccessCode, Error, PlayerName};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::invalid_field;

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    pub name: String,
    /// Access code; required once the account exists.
    #[serde(default)]
    pub code: Option<String>,
}

/// Successful login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Session credential, also usable as a bearer token.
    pub token: String,
    pub is_new_account: bool,
    /// Access code for a newly created account. Shown only once.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub name: String,
    pub friend_code: String,
    pub balance: i64,
}

impl From<LoginOutcome> for LoginResponse {
    fn from(outcome: LoginOutcome) -> Self {
        Self {
            token: outcome.session.as_ref().to_owned(),
            is_new_account: outcome.created,
            code: outcome.access_code.map(|code| code.expose().to_owned()),
            name: outcome.player.name.to_string(),
            friend_code: outcome.player.friend_code.to_string(),
            balance: outcome.player.balance,
        }
    }
}

fn parse_login(body: LoginBody) -> Result<LoginRequest, Error> {
    let name = PlayerName::new(&body.name).map_err(|err| invalid_field("name", err))?;
    let code = body
        .code
        .filter(|code| !code.trim().is_empty())
        .map(AccessCode::new)
        .transpose()
        .map_err(|err| invalid_field("code", err))?;
    Ok(LoginRequest { name, code })
}

/// Log in by name, creating the account on first use.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginBody,
    responses(
        (status = 200, description = "Login success", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Wrong access code", body = Error),
        (status = 409, description = "Name or friend code collision", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginBody>,
) -> ApiResult<HttpResponse> {
    let request = parse_login(payload.into_inner())?;
    let outcome = state.login.login(&request).await?;
    session.persist_token(&outcome.session)?;
    Ok(HttpResponse::Ok().json(LoginResponse::from(outcome)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, SessionToken};
    use crate::inbound::http::test_utils::{MockPorts, test_app, test_player};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::blank_name(json!({"name": "   "}), "name")]
    #[case::punctuation(json!({"name": "Misty!"}), "name")]
    fn parse_login_rejects_bad_fields(#[case] body: serde_json::Value, #[case] field: &str) {
        let body: LoginBody = serde_json::from_value(body).expect("body shape");
        let error = parse_login(body).expect_err("invalid input");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.details(), Some(&json!({"field": field, "code": "invalid_value"})));
    }

    #[rstest]
    fn blank_code_is_treated_as_absent() {
        let request = parse_login(LoginBody {
            name: " Misty ".into(),
            code: Some("  ".into()),
        })
        .expect("valid request");
        assert_eq!(request.name.as_ref(), "Misty");
        assert!(request.code.is_none());
    }

    #[actix_web::test]
    async fn new_account_returns_code_once_and_sets_cookie() {
        let mut ports = MockPorts::default();
        ports
            .login
            .expect_login()
            .withf(|request| request.name.as_ref() == "Misty" && request.code.is_none())
            .times(1)
            .returning(|_| {
                Ok(LoginOutcome {
                    player: test_player("Misty", "MSTYW234", 20),
                    session: SessionToken::parse("fresh-token").expect("token"),
                    created: true,
                    access_code: Some(AccessCode::new("K7QX2M").expect("code")),
                })
            });
        let app = actix_test::init_service(test_app(ports.into_state(), |cfg| {
            cfg.service(login);
        }))
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"name": "Misty"}))
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.response().cookies().any(|cookie| cookie.name() == "session"));
        let body: LoginResponse = actix_test::read_body_json(res).await;
        assert_eq!(body.token, "fresh-token");
        assert!(body.is_new_account);
        assert_eq!(body.code.as_deref(), Some("K7QX2M"));
        assert_eq!(body.friend_code, "MSTYW234");
        assert_eq!(body.balance, 20);
    }

    #[actix_web::test]
    async fn wrong_code_is_unauthorised() {
        let mut ports = MockPorts::default();
        ports
            .login
            .expect_login()
            .returning(|_| Err(Error::unauthorized("access code does not match")));
        let app = actix_test::init_service(test_app(ports.into_state(), |cfg| {
            cfg.service(login);
        }))
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"name": "Misty", "code": "WRONG2"}))
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
