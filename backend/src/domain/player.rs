//! Player account model and identity primitives.

use std::fmt;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;
use zeroize::Zeroizing;

use super::UniformSource;

const NAME_MAX_CHARS: usize = 24;
const ACCESS_CODE_LEN: usize = 6;
const FRIEND_CODE_LEN: usize = 8;
const SESSION_TOKEN_MAX_LEN: usize = 128;
// No 0/O or 1/I so codes survive being read aloud.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Validation errors for player identity values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlayerValidationError {
    #[error("player id must be a valid UUID")]
    InvalidId,
    #[error("player name must not be empty")]
    EmptyName,
    #[error("player name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("player name may only contain letters, numbers, spaces, underscores, or hyphens")]
    NameInvalidCharacters,
    #[error("friend code must be {len} characters from the code alphabet")]
    InvalidFriendCode { len: usize },
    #[error("access code must not be empty")]
    EmptyAccessCode,
    #[error("session token is malformed")]
    InvalidSessionToken,
}

/// Stable player identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(Uuid);

impl PlayerId {
    /// Parse a player id from its string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, PlayerValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(PlayerValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| PlayerValidationError::InvalidId)
    }

    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique display name chosen at first login.
///
/// ## Invariants
/// - Trimmed, non-empty, at most 24 characters.
/// - Letters, digits, spaces, underscores, and hyphens only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerName(String);

impl PlayerName {
    /// Validate and construct a name.
    pub fn new(name: impl AsRef<str>) -> Result<Self, PlayerValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PlayerValidationError::EmptyName);
        }
        if trimmed.chars().count() > NAME_MAX_CHARS {
            return Err(PlayerValidationError::NameTooLong {
                max: NAME_MAX_CHARS,
            });
        }
        let valid = trimmed
            .chars()
            .all(|ch| ch.is_alphanumeric() || matches!(ch, ' ' | '_' | '-'));
        if !valid {
            return Err(PlayerValidationError::NameInvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PlayerName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn random_code(source: &dyn UniformSource, len: usize) -> String {
    (0..len)
        .map(|_| {
            let index = source.pick_index(CODE_ALPHABET.len()).unwrap_or(0);
            char::from(CODE_ALPHABET.get(index).copied().unwrap_or(b'A'))
        })
        .collect()
}

/// Shareable code other players use to add a friend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FriendCode(String);

impl FriendCode {
    /// Parse a friend code, accepting lowercase input.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, PlayerValidationError> {
        let normalised = raw.as_ref().trim().to_ascii_uppercase();
        let valid = normalised.len() == FRIEND_CODE_LEN
            && normalised.bytes().all(|byte| CODE_ALPHABET.contains(&byte));
        if !valid {
            return Err(PlayerValidationError::InvalidFriendCode {
                len: FRIEND_CODE_LEN,
            });
        }
        Ok(Self(normalised))
    }

    /// Generate a random code.
    pub fn generate(source: &dyn UniformSource) -> Self {
        Self(random_code(source, FRIEND_CODE_LEN))
    }
}

impl AsRef<str> for FriendCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for FriendCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Secret verification code shown once when an account is created.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessCode(Zeroizing<String>);

impl AccessCode {
    /// Wrap a caller-supplied code.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, PlayerValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PlayerValidationError::EmptyAccessCode);
        }
        Ok(Self(Zeroizing::new(trimmed.to_ascii_uppercase())))
    }

    /// Generate a random code.
    pub fn generate(source: &dyn UniformSource) -> Self {
        Self(Zeroizing::new(random_code(source, ACCESS_CODE_LEN)))
    }

    /// Reveal the code for the one response that returns it.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Hash for storage.
    pub fn hash(&self) -> AccessCodeHash {
        AccessCodeHash(hex::encode(Sha256::digest(self.0.as_bytes())))
    }
}

impl fmt::Debug for AccessCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessCode(**redacted**)")
    }
}

/// Hex SHA-256 digest of an [`AccessCode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessCodeHash(String);

impl AccessCodeHash {
    /// Wrap a stored digest.
    pub fn from_stored(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    /// Whether `code` hashes to this digest.
    pub fn matches(&self, code: &AccessCode) -> bool {
        code.hash() == *self
    }
}

impl AsRef<str> for AccessCodeHash {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Opaque session credential issued on login.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Parse a token presented by a client.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, PlayerValidationError> {
        let raw = raw.as_ref();
        let valid = !raw.is_empty()
            && raw.len() <= SESSION_TOKEN_MAX_LEN
            && raw.bytes().all(|byte| byte.is_ascii_alphanumeric() || byte == b'-');
        if !valid {
            return Err(PlayerValidationError::InvalidSessionToken);
        }
        Ok(Self(raw.to_owned()))
    }

    /// Issue a new random token.
    pub fn issue() -> Self {
        Self(format!(
            "{}{}",
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple()
        ))
    }
}

impl AsRef<str> for SessionToken {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(**redacted**)")
    }
}

/// Persisted player account.
///
/// ## Invariants
/// - `balance >= 0` at every observable point.
/// - `last_accrual_at` only moves forward, in whole tick steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: PlayerName,
    pub access_code_hash: AccessCodeHash,
    pub friend_code: FriendCode,
    pub balance: i64,
    pub last_accrual_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Values inserted when an account is first created.
#[derive(Debug, Clone)]
pub struct NewPlayer {
    pub id: PlayerId,
    pub name: PlayerName,
    pub access_code_hash: AccessCodeHash,
    pub friend_code: FriendCode,
    pub session_token: SessionToken,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl NewPlayer {
    /// The account as it reads back right after insertion.
    pub fn to_player(&self) -> Player {
        Player {
            id: self.id,
            name: self.name.clone(),
            access_code_hash: self.access_code_hash.clone(),
            friend_code: self.friend_code.clone(),
            balance: self.balance,
            last_accrual_at: self.created_at,
            created_at: self.created_at,
        }
    }
}
