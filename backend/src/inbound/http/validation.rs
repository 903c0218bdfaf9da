//! Shared validation helpers for inbound HTTP adapters.

use std::fmt::Display;

use actix_web::error::JsonPayloadError;
use actix_web::{HttpRequest, web};
use serde_json::json;

use crate::domain::Error;

/// Field-scoped `invalid_request` with machine-readable details.
pub(crate) fn invalid_field(field: &'static str, reason: impl Display) -> Error {
    Error::invalid_request(reason.to_string()).with_details(json!({
        "field": field,
        "code": "invalid_value",
    }))
}

/// JSON extractor configuration that reports malformed bodies as domain
/// `invalid_request` errors instead of Actix's plain-text responses.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error)
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("malformed request body: {err}")).into()
}
