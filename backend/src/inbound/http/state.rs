//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CollectionCommand, FriendsCommand, LoginService, ProfileQuery, PurchaseCommand,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub profile: Arc<dyn ProfileQuery>,
    pub purchases: Arc<dyn PurchaseCommand>,
    pub collection: Arc<dyn CollectionCommand>,
    pub friends: Arc<dyn FriendsCommand>,
}

impl HttpState {
    pub fn new(
        login: Arc<dyn LoginService>,
        profile: Arc<dyn ProfileQuery>,
        purchases: Arc<dyn PurchaseCommand>,
        collection: Arc<dyn CollectionCommand>,
        friends: Arc<dyn FriendsCommand>,
    ) -> Self {
        Self {
            login,
            profile,
            purchases,
            collection,
            friends,
        }
    }
}
