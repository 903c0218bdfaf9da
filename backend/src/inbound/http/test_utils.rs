//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::http::header;
use actix_web::web;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

use crate::domain::ports::{
    MockCollectionCommand, MockFriendsCommand, MockLoginService, MockProfileQuery,
    MockPurchaseCommand,
};
use crate::domain::{AccessCode, FriendCode, Player, PlayerId, PlayerName};

use super::state::HttpState;
use super::validation::json_config;

/// Bearer token accepted by [`MockPorts::authenticate_as`].
pub const TEST_TOKEN: &str = "test-session-token";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// `Authorization` header carrying [`TEST_TOKEN`].
pub fn bearer() -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {TEST_TOKEN}"))
}

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub fn test_player(name: &str, friend_code: &str, balance: i64) -> Player {
    Player {
        id: PlayerId::random(),
        name: PlayerName::new(name).expect("valid name"),
        access_code_hash: AccessCode::new("ABC234").expect("valid code").hash(),
        friend_code: FriendCode::parse(friend_code).expect("valid friend code"),
        balance,
        last_accrual_at: fixed_time(),
        created_at: fixed_time(),
    }
}

/// One mock per driving port, converted into [`HttpState`] once
/// expectations are set.
#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub profile: MockProfileQuery,
    pub purchases: MockPurchaseCommand,
    pub collection: MockCollectionCommand,
    pub friends: MockFriendsCommand,
}

impl MockPorts {
    /// Resolve [`TEST_TOKEN`] to `player`; any other token is rejected.
    pub fn authenticate_as(&mut self, player: Player) {
        self.login
            .expect_authenticate()
            .returning(move |token| {
                if token.as_ref() == TEST_TOKEN {
                    Ok(player.clone())
                } else {
                    Err(crate::domain::Error::unauthorized("unknown session"))
                }
            });
    }

    pub fn into_state(self) -> HttpState {
        HttpState::new(
            Arc::new(self.login),
            Arc::new(self.profile),
            Arc::new(self.purchases),
            Arc::new(self.collection),
            Arc::new(self.friends),
        )
    }
}

/// App with the test session middleware, shared state, and `/api/v1` scope
/// registered by `configure`.
pub fn test_app(
    state: HttpState,
    configure: impl FnOnce(&mut web::ServiceConfig),
) -> actix_web::App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    actix_web::App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .wrap(test_session_middleware())
        .service(web::scope("/api/v1").configure(configure))
}
