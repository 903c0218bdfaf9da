//! PostgreSQL persistence adapters using Diesel with `diesel-async`.
//!
//! Repositories translate between row structs (`models.rs`) and domain
//! types; they hold no business rules. Every balance and collection write
//! is a single conditional statement so the database arbitrates concurrent
//! requests from the same player.
//!
//! ```ignore
//! use gacha_backend::outbound::persistence::{DbPool, DieselPlayerRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/gacha")).await?;
//! let players = DieselPlayerRepository::new(pool.clone());
//! ```

mod diesel_collection_repository;
mod diesel_friend_repository;
mod diesel_player_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_collection_repository::DieselCollectionRepository;
pub use diesel_friend_repository::DieselFriendRepository;
pub use diesel_player_repository::DieselPlayerRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
