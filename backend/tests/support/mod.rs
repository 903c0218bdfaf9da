//! Shared harness for HTTP integration tests over the in-memory store.
#![allow(dead_code, reason = "each test binary uses a different subset")]

#[path = "../../src/server/state_builders.rs"]
pub mod state_builders;

use std::sync::{Arc, Mutex};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header;
use actix_web::{App, test as actix_test, web};
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use serde_json::{Value, json};

use gacha_backend::Trace;
use gacha_backend::domain::ports::{CardCatalog, CardCatalogError};
use gacha_backend::domain::{
    BriefCard, CardDetail, CardResolverConfig, EconomyRules, ImageRef, OfflineCardPool,
    SeededUniformSource,
};
use gacha_backend::inbound::http::{configure_api, json_config};

use state_builders::{EngineParts, build_in_memory_state};

/// Clock that only moves when a test advances it.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_minutes(&self, minutes: i64) {
        let mut guard = self.0.lock().expect("clock mutex");
        *guard += TimeDelta::minutes(minutes);
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().expect("clock mutex")
    }
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Catalog holding a single card, or failing every read.
pub struct FakeCatalog {
    failing: bool,
}

impl FakeCatalog {
    pub fn charizard() -> Self {
        Self { failing: false }
    }

    pub fn unreachable() -> Self {
        Self { failing: true }
    }
}

#[async_trait]
impl CardCatalog for FakeCatalog {
    async fn brief_list(&self) -> Result<Arc<[BriefCard]>, CardCatalogError> {
        if self.failing {
            return Err(CardCatalogError::transport("connection refused"));
        }
        Ok(Arc::from(vec![BriefCard {
            id: Some("base1-4".into()),
            name: Some("Charizard".into()),
        }]))
    }

    async fn detail(&self, _id: &str) -> Result<Arc<CardDetail>, CardCatalogError> {
        if self.failing {
            return Err(CardCatalogError::transport("connection refused"));
        }
        Ok(Arc::new(CardDetail {
            name: Some("Charizard".into()),
            set_name: Some("Base".into()),
            rarity: Some("Rare Holo".into()),
            image: Some(ImageRef::Url("https://assets.example/base1/4".into())),
        }))
    }
}

pub fn engine(catalog: FakeCatalog, clock: Arc<MutableClock>) -> EngineParts {
    EngineParts {
        catalog: Arc::new(catalog),
        offline_pool: Arc::new(OfflineCardPool::default()),
        resolver: CardResolverConfig {
            max_tries: 2,
            ..CardResolverConfig::default()
        },
        rules: EconomyRules::default(),
        clock,
        random: Arc::new(SeededUniformSource::new(42)),
    }
}

pub async fn init_app(engine: EngineParts) -> impl TestService {
    let state = build_in_memory_state(engine);
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(json_config())
            .wrap(Trace)
            .service(web::scope("/api/v1").wrap(session).configure(configure_api)),
    )
    .await
}

/// App under test, as built by [`init_app`].
pub trait TestService:
    Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
}

impl<S> TestService for S where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

/// Log in and return the response body.
pub async fn login(app: &impl TestService, name: &str, code: Option<&str>) -> (u16, Value) {
    let mut body = json!({ "name": name });
    if let Some(code) = code {
        body["code"] = json!(code);
    }
    let req = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(body)
        .to_request();
    send(app, req).await
}

pub async fn get(app: &impl TestService, uri: &str, token: &str) -> (u16, Value) {
    let req = actix_test::TestRequest::get()
        .uri(uri)
        .insert_header(bearer(token))
        .to_request();
    send(app, req).await
}

pub async fn post(app: &impl TestService, uri: &str, token: &str, body: Value) -> (u16, Value) {
    let req = actix_test::TestRequest::post()
        .uri(uri)
        .insert_header(bearer(token))
        .set_json(body)
        .to_request();
    send(app, req).await
}

async fn send(app: &impl TestService, req: actix_http::Request) -> (u16, Value) {
    let res = actix_test::call_service(app, req).await;
    let status = res.status().as_u16();
    let bytes = actix_test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

pub fn token(login: &Value) -> String {
    login["token"].as_str().expect("token").to_owned()
}
