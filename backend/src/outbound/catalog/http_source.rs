//! Reqwest-backed catalog adapter.
//!
//! Owns transport only: URL construction, the per-request timeout, status
//! mapping, and JSON decoding into domain records. Timeouts and non-success
//! statuses are reported as retryable catalog errors.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dto::{BriefCardDto, CardDetailDto};
use crate::domain::ports::{CardCatalog, CardCatalogError};
use crate::domain::{BriefCard, CardDetail};

const DEFAULT_USER_AGENT: &str = "gacha-backend/0.1";
const LIST_PATH: &str = "cards";

/// Catalog adapter issuing `GET` requests against one base URL.
pub struct HttpCardCatalog {
    client: Client,
    base_url: Url,
}

impl HttpCardCatalog {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, CardCatalogError> {
        self.base_url
            .join(path)
            .map_err(|error| CardCatalogError::transport(format!("invalid catalog URL: {error}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CardCatalogError> {
        debug!(%url, "catalog request");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status));
        }
        decode(body.as_ref())
    }
}

#[async_trait]
impl CardCatalog for HttpCardCatalog {
    async fn brief_list(&self) -> Result<Arc<[BriefCard]>, CardCatalogError> {
        let url = self.endpoint(LIST_PATH)?;
        let cards: Vec<BriefCardDto> = self.get_json(url).await?;
        Ok(cards.into_iter().map(BriefCard::from).collect())
    }

    async fn detail(&self, id: &str) -> Result<Arc<CardDetail>, CardCatalogError> {
        let mut url = self.endpoint(LIST_PATH)?;
        url.path_segments_mut()
            .map_err(|()| CardCatalogError::transport("catalog base URL cannot hold a path"))?
            .pop_if_empty()
            .push(id);
        let detail: CardDetailDto = self.get_json(url).await?;
        Ok(Arc::new(CardDetail::from(detail)))
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, CardCatalogError> {
    serde_json::from_slice(body).map_err(|error| {
        CardCatalogError::decode(format!("invalid catalog JSON payload: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> CardCatalogError {
    if error.is_timeout() {
        CardCatalogError::timeout(error.to_string())
    } else {
        CardCatalogError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode) -> CardCatalogError {
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            CardCatalogError::timeout(format!("status {}", status.as_u16()))
        }
        _ => CardCatalogError::status(status.as_u16()),
    }
}
