//! HTTP inbound adapter exposing the REST endpoints.
//!
//! Handlers depend only on the driving ports bundled in [`state::HttpState`]
//! and authenticate through [`session::CurrentPlayer`].

pub mod accounts;
pub mod collection;
pub mod dto;
pub mod error;
pub mod friends;
pub mod health;
pub mod profile;
pub mod pulls;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;
pub use validation::json_config;

/// Register every `/api/v1` handler on `cfg`.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use gacha_backend::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(accounts::login)
        .service(profile::get_profile)
        .service(pulls::purchase_one)
        .service(collection::list_collection)
        .service(collection::list_history)
        .service(collection::sell)
        .service(friends::add_friend)
        .service(friends::list_friends)
        .service(friends::list_friend_collection);
}
