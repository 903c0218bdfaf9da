//! DTOs for decoding catalog JSON responses.
//!
//! Fields the resolver tolerates as missing are optional here; the domain
//! decides whether a record is usable.

use serde::Deserialize;

use crate::domain::{BriefCard, CardDetail, ImageRef, ImageVariants};

#[derive(Debug, Deserialize)]
pub(super) struct BriefCardDto {
    #[serde(default)]
    pub(super) id: Option<String>,
    #[serde(default)]
    pub(super) name: Option<String>,
}

impl From<BriefCardDto> for BriefCard {
    fn from(value: BriefCardDto) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum SetDto {
    Named {
        #[serde(default)]
        name: Option<String>,
    },
    Plain(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum ImageDto {
    Url(String),
    Variants {
        #[serde(default)]
        high: Option<String>,
        #[serde(default)]
        large: Option<String>,
        #[serde(default)]
        medium: Option<String>,
        #[serde(default)]
        small: Option<String>,
        #[serde(default)]
        generic: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
pub(super) struct CardDetailDto {
    #[serde(default)]
    pub(super) name: Option<String>,
    #[serde(default)]
    pub(super) set: Option<SetDto>,
    #[serde(default)]
    pub(super) rarity: Option<String>,
    #[serde(default)]
    pub(super) image: Option<ImageDto>,
}

impl From<ImageDto> for ImageRef {
    fn from(value: ImageDto) -> Self {
        match value {
            ImageDto::Url(url) => Self::Url(url),
            ImageDto::Variants {
                high,
                large,
                medium,
                small,
                generic,
            } => Self::Variants(ImageVariants {
                high,
                large,
                medium,
                small,
                generic,
            }),
        }
    }
}

impl From<CardDetailDto> for CardDetail {
    fn from(value: CardDetailDto) -> Self {
        let set_name = value.set.and_then(|set| match set {
            SetDto::Named { name } => name,
            SetDto::Plain(name) => Some(name),
        });
        Self {
            name: value.name,
            set_name,
            rarity: value.rarity,
            image: value.image.map(ImageRef::from),
        }
    }
}
