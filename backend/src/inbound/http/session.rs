//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Login stores the issued [`SessionToken`] in the cookie session. Requests
//! may instead present it as `Authorization: Bearer <token>`; the header wins
//! when both are present. [`CurrentPlayer`] resolves the token through the
//! login port, which also settles pending income.

use actix_session::Session;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, Player, SessionToken};

use super::state::HttpState;

pub(crate) const SESSION_TOKEN_KEY: &str = "session_token";
const BEARER_SCHEME: &str = "bearer";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist a freshly issued token, rotating the session identifier.
    pub fn persist_token(&self, token: &SessionToken) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(SESSION_TOKEN_KEY, token.as_ref())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Token stored in the cookie, if present and well formed.
    pub fn token(&self) -> Result<Option<SessionToken>, Error> {
        let raw = self
            .0
            .get::<String>(SESSION_TOKEN_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|raw| match SessionToken::parse(raw) {
            Ok(token) => Some(token),
            Err(error) => {
                warn!(%error, "discarding malformed session token from cookie");
                None
            }
        }))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

/// Parse `Authorization: Bearer <token>`.
///
/// `None` when the header is absent; a present but unusable header is an
/// authentication failure rather than a fallback to the cookie.
fn bearer_token(req: &HttpRequest) -> Option<Result<SessionToken, Error>> {
    let value = req.headers().get(header::AUTHORIZATION)?;
    let parsed = value
        .to_str()
        .ok()
        .and_then(|raw| raw.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case(BEARER_SCHEME))
        .and_then(|(_, token)| SessionToken::parse(token.trim()).ok())
        .ok_or_else(|| Error::unauthorized("malformed bearer token"));
    Some(parsed)
}

/// The authenticated player for this request.
#[derive(Debug, Clone)]
pub struct CurrentPlayer(pub Player);

impl CurrentPlayer {
    pub fn into_inner(self) -> Player {
        self.0
    }
}

impl FromRequest for CurrentPlayer {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let bearer = bearer_token(req);
        let session = Session::from_request(req, payload);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let token = match bearer {
                Some(token) => Some(token?),
                None => SessionContext::new(session.await?).token()?,
            };
            let token = token.ok_or_else(|| Error::unauthorized("login required"))?;
            state.login.authenticate(&token).await.map(Self)
        })
    }
}
