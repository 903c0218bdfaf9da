//! Domain primitives, ports, and services for the card economy.
//!
//! Purpose: hold the acquisition and economy engine independent of any
//! transport or store. Inbound adapters call the driving ports in
//! [`ports`]; outbound adapters implement the driven ones.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Card, CardKey, CardKeyDigest: drawn cards and their composite identity.
//! - CardResolver: catalog draws with offline fallback.
//! - EconomyLedger, accrue: balance mutations and lazy income.
//! - Account, purchase, collection, and friend services.

pub mod account_service;
pub mod card;
pub mod card_resolver;
pub mod collection;
pub mod collection_service;
pub mod economy;
pub mod economy_ledger;
pub mod error;
pub mod friend;
pub mod friend_service;
pub mod grading;
pub mod offline_pool;
pub mod player;
pub mod ports;
pub mod purchase_service;
pub mod random;
mod store_errors;
pub mod trace_id;

pub use self::account_service::AccountService;
pub use self::card::{
    BriefCard, Card, CardDetail, CardImages, CardKey, CardKeyDigest, CardKeyDigestError, ImageRef,
    ImageVariants, normalize_image,
};
pub use self::card_resolver::{
    CardOrigin, CardResolver, CardResolverConfig, DrawnCard, SourceMode,
};
pub use self::collection::{CollectionEntry, PullRecord, PullStats, SaleOutcome};
pub use self::collection_service::CollectionService;
pub use self::economy::{Accrual, EconomyRules, accrue};
pub use self::economy_ledger::EconomyLedger;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::friend::FriendSummary;
pub use self::friend_service::FriendService;
pub use self::grading::{
    Grade, GradeBand, GradeOutOfRange, grade_for_sample, roll_grade, roll_mint,
};
pub use self::offline_pool::{OfflineCardPool, OfflineCardRecord};
pub use self::player::{
    AccessCode, AccessCodeHash, FriendCode, NewPlayer, Player, PlayerId, PlayerName,
    PlayerValidationError, SessionToken,
};
pub use self::purchase_service::PurchaseService;
pub use self::random::{
    ScriptedUniformSource, SeededUniformSource, ThreadRngSource, UniformSource,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
