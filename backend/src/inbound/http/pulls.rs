//! Purchase handler: one paid pull per request.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::PurchaseReceipt;
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::CardBody;
use crate::inbound::http::session::CurrentPlayer;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PulledCardBody {
    pub key: String,
    #[serde(flatten)]
    pub card: CardBody,
    pub grade: u8,
    pub mint: bool,
    /// `catalog` or `offline_pool`.
    pub source: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PullResponse {
    pub balance: i64,
    pub card: PulledCardBody,
}

impl From<PurchaseReceipt> for PullResponse {
    fn from(receipt: PurchaseReceipt) -> Self {
        Self {
            balance: receipt.balance,
            card: PulledCardBody {
                key: receipt.key.to_string(),
                card: receipt.card.into(),
                grade: receipt.grade.value(),
                mint: receipt.mint,
                source: receipt.origin.as_str().to_owned(),
            },
        }
    }
}

/// Spend one pull's cost and receive a graded card.
///
/// On `no_card_available` the cost has already been refunded.
#[utoipa::path(
    post,
    path = "/api/v1/pulls",
    responses(
        (status = 200, description = "Card pulled", body = PullResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 402, description = "Balance below pull cost", body = Error),
        (status = 503, description = "No card available; cost refunded", body = Error)
    ),
    tags = ["pulls"],
    operation_id = "purchaseOne"
)]
#[post("/pulls")]
pub async fn purchase_one(
    state: web::Data<HttpState>,
    player: CurrentPlayer,
) -> ApiResult<web::Json<PullResponse>> {
    let receipt = state.purchases.purchase_one(&player.0.id).await?;
    Ok(web::Json(receipt.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Card, CardOrigin, ErrorCode, Grade};
    use crate::inbound::http::test_utils::{MockPorts, bearer, test_app, test_player};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;

    fn receipt() -> PurchaseReceipt {
        let card = Card {
            name: "Gengar".into(),
            set_name: "Fossil".into(),
            rarity: "Rare Holo".into(),
            image: "https://img.example/fossil/5/low.webp".into(),
            image_high: Some("https://img.example/fossil/5/high.webp".into()),
        };
        PurchaseReceipt {
            balance: 15,
            key: card.key().digest(),
            card,
            grade: Grade::new(9).expect("grade"),
            mint: false,
            origin: CardOrigin::Catalog,
        }
    }

    #[actix_web::test]
    async fn returns_card_and_new_balance() {
        let mut ports = MockPorts::default();
        ports.authenticate_as(test_player("Misty", "MSTYW234", 20));
        ports
            .purchases
            .expect_purchase_one()
            .times(1)
            .returning(|_| Ok(receipt()));
        let app = actix_test::init_service(test_app(ports.into_state(), |cfg| {
            cfg.service(purchase_one);
        }))
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/pulls")
            .insert_header(bearer())
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = actix_test::read_body_json(res).await;
        assert_eq!(body["balance"], 15);
        assert_eq!(body["card"]["name"], "Gengar");
        assert_eq!(body["card"]["set"], "Fossil");
        assert_eq!(body["card"]["imageHigh"], "https://img.example/fossil/5/high.webp");
        assert_eq!(body["card"]["grade"], 9);
        assert_eq!(body["card"]["source"], "catalog");
    }

    #[actix_web::test]
    async fn insufficient_funds_is_payment_required() {
        let mut ports = MockPorts::default();
        ports.authenticate_as(test_player("Misty", "MSTYW234", 2));
        ports
            .purchases
            .expect_purchase_one()
            .returning(|_| Err(Error::insufficient_funds("a pull costs 5")));
        let app = actix_test::init_service(test_app(ports.into_state(), |cfg| {
            cfg.service(purchase_one);
        }))
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/pulls")
            .insert_header(bearer())
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::PAYMENT_REQUIRED);
        let body: Error = actix_test::read_body_json(res).await;
        assert_eq!(body.code(), ErrorCode::InsufficientFunds);
    }
}
