//! Process configuration loaded through OrthoConfig.
//!
//! Values come from CLI flags, `GACHA_*` environment variables, and an
//! optional config file. Unset optional values fall back to the defaults
//! exposed by the accessor methods.

use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use gacha_backend::domain::{CardResolverConfig, SourceMode};
use gacha_backend::outbound::cache::CatalogCacheConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_CATALOG_BASE_URL: &str = "https://api.tcgdex.net/v2/en";
const DEFAULT_CATALOG_TIMEOUT_SECS: u64 = 20;
const DEFAULT_BRIEF_LIST_TTL_SECS: u64 = 6 * 60 * 60;
const DEFAULT_DETAIL_TTL_SECS: u64 = 24 * 60 * 60;
const DEFAULT_DRAW_ATTEMPTS: u32 = 6;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

fn default_offline_pool_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("offline_cards.json")
}

/// Startup configuration for the backend binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GACHA")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one the process keeps state in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Base URL of the remote card catalog.
    pub catalog_base_url: Option<String>,
    /// Skip the remote catalog and draw only from the offline pool.
    pub offline_only: Option<bool>,
    /// JSON file holding the offline card pool.
    pub offline_pool_path: Option<PathBuf>,
    /// Per-request catalog timeout.
    pub catalog_timeout_secs: Option<u64>,
    pub brief_list_ttl_secs: Option<u64>,
    pub detail_ttl_secs: Option<u64>,
    /// Remote catalog tries per draw before falling back to the offline pool.
    pub draw_attempts: Option<u32>,
    /// File holding the cookie signing key material.
    pub session_key_file: Option<PathBuf>,
    /// Permit a generated key when the key file is unreadable.
    pub session_allow_ephemeral: Option<bool>,
    /// Mark session cookies `Secure`. Defaults to on.
    pub cookie_secure: Option<bool>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    pub fn offline_only(&self) -> bool {
        self.offline_only.unwrap_or(false)
    }

    pub fn session_allow_ephemeral(&self) -> bool {
        self.session_allow_ephemeral.unwrap_or(false)
    }

    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    pub fn catalog_base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(
            self.catalog_base_url
                .as_deref()
                .unwrap_or(DEFAULT_CATALOG_BASE_URL),
        )
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(
            self.catalog_timeout_secs
                .unwrap_or(DEFAULT_CATALOG_TIMEOUT_SECS),
        )
    }

    pub fn cache_config(&self) -> CatalogCacheConfig {
        CatalogCacheConfig {
            brief_list_ttl: Duration::from_secs(
                self.brief_list_ttl_secs
                    .unwrap_or(DEFAULT_BRIEF_LIST_TTL_SECS),
            ),
            detail_ttl: Duration::from_secs(
                self.detail_ttl_secs.unwrap_or(DEFAULT_DETAIL_TTL_SECS),
            ),
        }
    }

    pub fn resolver_config(&self) -> CardResolverConfig {
        CardResolverConfig {
            mode: if self.offline_only() {
                SourceMode::OfflineOnly
            } else {
                SourceMode::Hybrid
            },
            max_tries: self.draw_attempts.unwrap_or(DEFAULT_DRAW_ATTEMPTS).max(1),
        }
    }

    pub fn offline_pool_path(&self) -> PathBuf {
        self.offline_pool_path
            .clone()
            .unwrap_or_else(default_offline_pool_path)
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }
}
