//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod card_catalog;
mod collection_command;
mod collection_repository;
mod friend_repository;
mod friends_command;
mod login_service;
mod player_repository;
mod profile_query;
mod purchase_command;

#[cfg(test)]
pub use card_catalog::MockCardCatalog;
pub use card_catalog::{CardCatalog, CardCatalogError, DisabledCardCatalog};
#[cfg(test)]
pub use collection_command::MockCollectionCommand;
pub use collection_command::{CollectionCommand, CollectionView};
#[cfg(test)]
pub use collection_repository::MockCollectionRepository;
pub use collection_repository::{CollectionRepository, CollectionRepositoryError};
#[cfg(test)]
pub use friend_repository::MockFriendRepository;
pub use friend_repository::{FriendRepository, FriendRepositoryError};
pub use friends_command::FriendsCommand;
#[cfg(test)]
pub use friends_command::MockFriendsCommand;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{LoginOutcome, LoginRequest, LoginService};
#[cfg(test)]
pub use player_repository::MockPlayerRepository;
pub use player_repository::{AccrualUpdate, PlayerRepository, PlayerRepositoryError};
#[cfg(test)]
pub use profile_query::MockProfileQuery;
pub use profile_query::{Profile, ProfileQuery};
#[cfg(test)]
pub use purchase_command::MockPurchaseCommand;
pub use purchase_command::{PurchaseCommand, PurchaseReceipt};
