//! Card model shared by the catalog, the offline pool, and the collection.
//!
//! A drawn [`Card`] is immutable. Its [`CardKey`] is the composite identity
//! used to merge repeated pulls of the same card; keys are compared
//! structurally and persisted as a [`CardKeyDigest`] computed over
//! length-prefixed fields, so two different cards can never collide through
//! delimiter ambiguity.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use url::Url;

const LOW_RES_SUFFIX: &str = "low.webp";
const HIGH_RES_SUFFIX: &str = "high.webp";
const DIGEST_HEX_LEN: usize = 64;

/// Card as produced by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    pub set_name: String,
    pub rarity: String,
    /// Low-resolution reference for list and collection display.
    pub image: String,
    /// High-resolution reference for zoom, when derivable.
    pub image_high: Option<String>,
}

impl Card {
    /// Composite identity of this card.
    pub fn key(&self) -> CardKey {
        CardKey {
            name: self.name.clone(),
            set_name: self.set_name.clone(),
            image: self.image.clone(),
        }
    }
}

/// Composite identity over `(name, set, image)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardKey {
    pub name: String,
    pub set_name: String,
    pub image: String,
}

impl CardKey {
    /// Stable digest used as the storage and API key.
    pub fn digest(&self) -> CardKeyDigest {
        let mut hasher = Sha256::new();
        for field in [&self.name, &self.set_name, &self.image] {
            hasher.update((field.len() as u64).to_be_bytes());
            hasher.update(field.as_bytes());
        }
        CardKeyDigest(hex::encode(hasher.finalize()))
    }
}

/// Lowercase hex SHA-256 digest of a [`CardKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardKeyDigest(String);

/// Raised when a client supplies a malformed card key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("card key must be a 64 character lowercase hex digest")]
pub struct CardKeyDigestError;

impl CardKeyDigest {
    /// Parse a digest presented by a client or read from storage.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, CardKeyDigestError> {
        let raw = raw.as_ref().trim();
        let valid = raw.len() == DIGEST_HEX_LEN
            && raw
                .bytes()
                .all(|byte| byte.is_ascii_digit() || (b'a'..=b'f').contains(&byte));
        if !valid {
            return Err(CardKeyDigestError);
        }
        Ok(Self(raw.to_owned()))
    }
}

impl AsRef<str> for CardKeyDigest {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CardKeyDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Minimal catalog list entry used to pick a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BriefCard {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Image field as the catalog reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// A single URL, possibly without a file extension.
    Url(String),
    /// Quality-keyed variants.
    Variants(ImageVariants),
}

/// Quality variants offered by a structured image field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageVariants {
    pub high: Option<String>,
    pub large: Option<String>,
    pub medium: Option<String>,
    pub small: Option<String>,
    pub generic: Option<String>,
}

/// Full catalog record for one card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDetail {
    pub name: Option<String>,
    pub set_name: Option<String>,
    pub rarity: Option<String>,
    pub image: Option<ImageRef>,
}

/// Display references derived from an [`ImageRef`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardImages {
    pub low: String,
    pub high: Option<String>,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|raw| raw.trim()).filter(|raw| !raw.is_empty())
}

/// Whether the last path segment of `reference` carries a file extension.
///
/// Absolute URLs are judged on their path alone, so a bare host such as
/// `https://cdn.example.com` has no extension.
fn has_file_extension(reference: &str) -> bool {
    if let Ok(url) = Url::parse(reference) {
        return url
            .path_segments()
            .and_then(|mut segments| segments.rfind(|segment| !segment.is_empty()))
            .is_some_and(segment_has_extension);
    }
    let path = reference
        .split(['?', '#'])
        .next()
        .unwrap_or(reference)
        .trim_end_matches('/');
    segment_has_extension(path.rsplit('/').next().unwrap_or(path))
}

fn segment_has_extension(segment: &str) -> bool {
    match segment.rsplit_once('.') {
        Some((stem, ext)) => {
            !stem.is_empty()
                && (1..=5).contains(&ext.len())
                && ext.chars().all(|ch| ch.is_ascii_alphanumeric())
        }
        None => false,
    }
}

fn with_suffix(base: &str, suffix: &str) -> String {
    format!("{}/{suffix}", base.trim_end_matches('/'))
}

/// Derive low/high display references from a catalog image field.
///
/// Extensionless references follow the `<base>/low.webp` and
/// `<base>/high.webp` convention. Structured fields resolve the preferred
/// variant in the order high, large, medium, small, generic. Returns `None`
/// when no usable reference exists.
pub fn normalize_image(image: &ImageRef) -> Option<CardImages> {
    match image {
        ImageRef::Url(raw) => {
            let reference = raw.trim();
            if reference.is_empty() {
                return None;
            }
            if has_file_extension(reference) {
                Some(CardImages {
                    low: reference.to_owned(),
                    high: None,
                })
            } else {
                Some(CardImages {
                    low: with_suffix(reference, LOW_RES_SUFFIX),
                    high: Some(with_suffix(reference, HIGH_RES_SUFFIX)),
                })
            }
        }
        ImageRef::Variants(variants) => normalize_variants(variants),
    }
}

fn normalize_variants(variants: &ImageVariants) -> Option<CardImages> {
    let hi_res = non_blank(variants.high.as_ref()).or_else(|| non_blank(variants.large.as_ref()));
    let lo_res = non_blank(variants.medium.as_ref())
        .or_else(|| non_blank(variants.small.as_ref()))
        .or_else(|| non_blank(variants.generic.as_ref()));
    let preferred = hi_res.or(lo_res)?;

    if !has_file_extension(preferred) {
        return Some(CardImages {
            low: with_suffix(preferred, LOW_RES_SUFFIX),
            high: Some(with_suffix(preferred, HIGH_RES_SUFFIX)),
        });
    }
    Some(CardImages {
        low: lo_res.unwrap_or(preferred).to_owned(),
        high: hi_res.map(str::to_owned),
    })
}
