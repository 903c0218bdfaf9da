//! Builders wiring repositories and engine parts into the HTTP state.
//!
//! Integration tests include this file directly, so it only refers to the
//! library through `gacha_backend::` paths.

use std::sync::Arc;

use mockable::Clock;

use gacha_backend::domain::ports::{
    CardCatalog, CollectionRepository, FriendRepository, PlayerRepository,
};
use gacha_backend::domain::{
    AccountService, CardResolver, CardResolverConfig, CollectionService, EconomyLedger,
    EconomyRules, FriendService, OfflineCardPool, PurchaseService, UniformSource,
};
use gacha_backend::inbound::http::state::HttpState;
use gacha_backend::outbound::memory::InMemoryStore;
use gacha_backend::outbound::persistence::{
    DbPool, DieselCollectionRepository, DieselFriendRepository, DieselPlayerRepository,
};

/// Store-independent parts of the engine.
#[derive(Clone)]
pub struct EngineParts {
    pub catalog: Arc<dyn CardCatalog>,
    pub offline_pool: Arc<OfflineCardPool>,
    pub resolver: CardResolverConfig,
    pub rules: EconomyRules,
    pub clock: Arc<dyn Clock>,
    pub random: Arc<dyn UniformSource>,
}

/// Wire every service over the given repositories.
pub fn build_http_state<P, C, F>(
    players: Arc<P>,
    collections: Arc<C>,
    friends: Arc<F>,
    engine: EngineParts,
) -> HttpState
where
    P: PlayerRepository + 'static,
    C: CollectionRepository + 'static,
    F: FriendRepository + 'static,
{
    let EngineParts {
        catalog,
        offline_pool,
        resolver,
        rules,
        clock,
        random,
    } = engine;

    let ledger = Arc::new(EconomyLedger::new(players.clone(), clock.clone(), rules));
    let resolver = Arc::new(CardResolver::new(
        catalog,
        offline_pool,
        random.clone(),
        resolver,
    ));
    let accounts = Arc::new(AccountService::new(
        players.clone(),
        collections.clone(),
        ledger.clone(),
        random.clone(),
    ));
    let purchases = Arc::new(PurchaseService::new(
        ledger.clone(),
        collections.clone(),
        resolver,
        random,
    ));
    let collection = Arc::new(CollectionService::new(ledger, collections.clone()));
    let friends = Arc::new(FriendService::new(players, friends, collections, clock));

    HttpState::new(accounts.clone(), accounts, purchases, collection, friends)
}

/// State backed by a fresh process-local store.
pub fn build_in_memory_state(engine: EngineParts) -> HttpState {
    let store = Arc::new(InMemoryStore::new());
    build_http_state(store.clone(), store.clone(), store, engine)
}

/// State backed by PostgreSQL repositories sharing `pool`.
#[cfg_attr(test, allow(dead_code))]
pub fn build_diesel_state(pool: &DbPool, engine: EngineParts) -> HttpState {
    build_http_state(
        Arc::new(DieselPlayerRepository::new(pool.clone())),
        Arc::new(DieselCollectionRepository::new(pool.clone())),
        Arc::new(DieselFriendRepository::new(pool.clone())),
        engine,
    )
}
