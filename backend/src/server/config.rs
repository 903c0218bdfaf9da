//! Listener and session-cookie settings handed to [`super::create_server`].

use std::net::SocketAddr;

use actix_web::cookie::Key;

pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) bind_addr: SocketAddr,
}

impl ServerConfig {
    /// `key` signs and encrypts the session cookie; `cookie_secure` restricts
    /// it to HTTPS.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            bind_addr,
        }
    }
}
