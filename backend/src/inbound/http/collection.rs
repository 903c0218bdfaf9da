//! Own-collection handlers: listing, history, and selling.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CardKeyDigest, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{CollectionItemBody, HistoryItemBody};
use crate::inbound::http::session::CurrentPlayer;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::invalid_field;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionResponse {
    pub balance: i64,
    pub items: Vec<CollectionItemBody>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub items: Vec<HistoryItemBody>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SellBody {
    /// Collection entry key as returned by the collection listing.
    pub key: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub balance: i64,
}

#[utoipa::path(
    get,
    path = "/api/v1/collection",
    responses(
        (status = 200, description = "Collection, most recently pulled first", body = CollectionResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["collection"],
    operation_id = "listCollection"
)]
#[get("/collection")]
pub async fn list_collection(
    state: web::Data<HttpState>,
    player: CurrentPlayer,
) -> ApiResult<web::Json<CollectionResponse>> {
    let view = state.collection.list_collection(&player.0.id).await?;
    Ok(web::Json(CollectionResponse {
        balance: view.balance,
        items: view.items.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/history",
    responses(
        (status = 200, description = "Most recent pulls, newest first", body = HistoryResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["collection"],
    operation_id = "listHistory"
)]
#[get("/history")]
pub async fn list_history(
    state: web::Data<HttpState>,
    player: CurrentPlayer,
) -> ApiResult<web::Json<HistoryResponse>> {
    let pulls = state.collection.list_history(&player.0.id).await?;
    Ok(web::Json(HistoryResponse {
        items: pulls.into_iter().map(Into::into).collect(),
    }))
}

/// Sell one copy of a collection entry.
#[utoipa::path(
    post,
    path = "/api/v1/collection/sell",
    request_body = SellBody,
    responses(
        (status = 200, description = "Sold; new balance", body = BalanceResponse),
        (status = 400, description = "Malformed key", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Card not in collection", body = Error)
    ),
    tags = ["collection"],
    operation_id = "sell"
)]
#[post("/collection/sell")]
pub async fn sell(
    state: web::Data<HttpState>,
    player: CurrentPlayer,
    payload: web::Json<SellBody>,
) -> ApiResult<web::Json<BalanceResponse>> {
    let key = CardKeyDigest::parse(&payload.key).map_err(|err| invalid_field("key", err))?;
    let balance = state.collection.sell(&player.0.id, &key).await?;
    Ok(web::Json(BalanceResponse { balance }))
}
