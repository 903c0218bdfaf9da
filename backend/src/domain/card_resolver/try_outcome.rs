//! Outcome of one remote draw try.
//!
//! Keeping "skip and continue" apart from "stop trying" lets the loop fold
//! tries without conflating transient failures with a disabled catalog.

use crate::domain::Card;
use crate::domain::ports::CardCatalogError;

pub(super) enum TryOutcome {
    Drawn(Card),
    Skip(SkipReason),
    Abort(CardCatalogError),
}

#[derive(Debug)]
pub(super) enum SkipReason {
    ListUnavailable(CardCatalogError),
    EmptyList,
    MissingId,
    DetailUnavailable(CardCatalogError),
    MissingName,
    NoUsableImage,
}

impl SkipReason {
    pub(super) fn label(&self) -> &'static str {
        match self {
            Self::ListUnavailable(_) => "list_unavailable",
            Self::EmptyList => "empty_list",
            Self::MissingId => "missing_id",
            Self::DetailUnavailable(_) => "detail_unavailable",
            Self::MissingName => "missing_name",
            Self::NoUsableImage => "no_usable_image",
        }
    }
}

/// Classify a catalog failure for the list step.
pub(super) fn list_failure(error: CardCatalogError) -> TryOutcome {
    if error.is_retryable() {
        TryOutcome::Skip(SkipReason::ListUnavailable(error))
    } else {
        TryOutcome::Abort(error)
    }
}

/// Classify a catalog failure for the detail step.
pub(super) fn detail_failure(error: CardCatalogError) -> TryOutcome {
    if error.is_retryable() {
        TryOutcome::Skip(SkipReason::DetailUnavailable(error))
    } else {
        TryOutcome::Abort(error)
    }
}
