//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every inbound HTTP path together with the request
//! and response bodies they reference, plus two security schemes: the
//! session cookie set by login and the equivalent bearer token.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::accounts::{LoginBody, LoginResponse};
use crate::inbound::http::collection::{
    BalanceResponse, CollectionResponse, HistoryResponse, SellBody,
};
use crate::inbound::http::dto::{CardBody, CollectionItemBody, FriendBody, HistoryItemBody};
use crate::inbound::http::friends::{
    AddFriendBody, AddFriendResponse, FriendCollectionResponse, FriendsResponse,
};
use crate::inbound::http::profile::{ProfileResponse, StatsBody};
use crate::inbound::http::pulls::{PullResponse, PulledCardBody};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("The `token` returned by POST /api/v1/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI serves it in debug builds.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Gacha card backend API",
        description = "Accounts, paid pulls, collections, and friends for the card economy."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = []), ("BearerToken" = [])),
    paths(
        crate::inbound::http::accounts::login,
        crate::inbound::http::profile::get_profile,
        crate::inbound::http::pulls::purchase_one,
        crate::inbound::http::collection::list_collection,
        crate::inbound::http::collection::list_history,
        crate::inbound::http::collection::sell,
        crate::inbound::http::friends::add_friend,
        crate::inbound::http::friends::list_friends,
        crate::inbound::http::friends::list_friend_collection,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        LoginBody,
        LoginResponse,
        ProfileResponse,
        StatsBody,
        PullResponse,
        PulledCardBody,
        CardBody,
        CollectionItemBody,
        HistoryItemBody,
        CollectionResponse,
        HistoryResponse,
        SellBody,
        BalanceResponse,
        FriendBody,
        AddFriendBody,
        AddFriendResponse,
        FriendsResponse,
        FriendCollectionResponse,
    )),
    tags(
        (name = "accounts", description = "Login and profile"),
        (name = "pulls", description = "Paid card draws"),
        (name = "collection", description = "Owned cards, history, and sales"),
        (name = "friends", description = "Friend edges and friend collections"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn schema_fields(name: &str) -> Vec<String> {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get(name).unwrap_or_else(|| panic!("{name} schema")) {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            _ => panic!("expected object schema for {name}"),
        }
    }

    #[rstest]
    #[case("/api/v1/login")]
    #[case("/api/v1/pulls")]
    #[case("/api/v1/collection/sell")]
    #[case("/api/v1/friends/{friendCode}/collection")]
    #[case("/health/ready")]
    fn documents_path(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn login_response_uses_camel_case() {
        let fields = schema_fields("LoginResponse");
        assert!(fields.contains(&"isNewAccount".to_owned()));
        assert!(fields.contains(&"friendCode".to_owned()));
    }
}
