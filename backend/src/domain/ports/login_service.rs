//! Driving port for login and session resolution.
//!
//! Inbound adapters call this port to exchange a name (and, for existing
//! accounts, an access code) for a session token, and to resolve a presented
//! token back to a player with pending income settled.

use async_trait::async_trait;

use crate::domain::{AccessCode, Error, Player, PlayerName, SessionToken};

/// Credentials presented at login.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub name: PlayerName,
    /// Required for existing accounts, ignored when the name is new.
    pub code: Option<AccessCode>,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub player: Player,
    pub session: SessionToken,
    /// Whether this login created the account.
    pub created: bool,
    /// Access code for a newly created account; returned exactly once.
    pub access_code: Option<AccessCode>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Log in by name, creating the account on first use.
    async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome, Error>;

    /// Resolve `token` to its player after settling pending income.
    async fn authenticate(&self, token: &SessionToken) -> Result<Player, Error>;
}
