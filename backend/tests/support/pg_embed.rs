//! Embedded PostgreSQL for the Diesel repository suites.
//!
//! Every test gets its own migrated database on a cluster shared by the
//! test binary. When the cluster cannot start, set `SKIP_TEST_CLUSTER=1` to
//! skip these suites instead of failing them.
#![allow(dead_code, reason = "each repository suite uses a different subset")]

use std::future::Future;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use gacha_backend::domain::{
    AccessCode, Card, FriendCode, Grade, NewPlayer, PlayerId, PlayerName, PullRecord,
    SessionToken,
};
use gacha_backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use tokio::runtime::Runtime;

const CLUSTER_RETRIES: usize = 5;
const CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);
const POOL_SIZE: u32 = 4;
// Reused data directories keep the password chosen at initdb time.
const STABLE_PASSWORD: &str = "gacha_embedded_test";

static BOOTSTRAP_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip when `SKIP_TEST_CLUSTER` is truthy, otherwise fail loudly.
fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    let _bootstrap = BOOTSTRAP_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());
    let _password = std::env::var_os("PG_PASSWORD")
        .is_none()
        .then(|| env_lock::lock_env([("PG_PASSWORD", Some(STABLE_PASSWORD.to_owned()))]));

    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(_) if attempt < CLUSTER_RETRIES => {
                std::thread::sleep(CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
            Err(err) => return Err(format!("{err:?}")),
        }
    }
}

/// A migrated database, a pool over it, and the runtime that drives both.
pub struct StoreContext {
    runtime: Runtime,
    pool: DbPool,
    _database: TemporaryDatabase,
}

impl StoreContext {
    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

fn setup() -> Result<StoreContext, String> {
    let cluster = shared_cluster()?;
    let name = format!("gacha_{}", uuid::Uuid::new_v4().simple());
    let database = cluster
        .temporary_database(name.as_str())
        .map_err(|err| format!("create database: {err:?}"))?;
    let url = database.url().to_string();
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let pool = runtime.block_on(async {
        run_migrations(&url).await.map_err(|err| err.to_string())?;
        DbPool::new(PoolConfig::new(url.as_str()).with_max_size(POOL_SIZE))
            .await
            .map_err(|err| err.to_string())
    })?;
    Ok(StoreContext {
        runtime,
        pool,
        _database: database,
    })
}

/// Fresh store for one test, or `None` when the cluster is skipped.
///
/// Must be called outside any Tokio runtime.
pub fn store_context() -> Option<StoreContext> {
    match setup() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

/// Whole-second timestamps survive the round trip through `timestamptz`.
pub fn at_minute(minute: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
        + TimeDelta::minutes(minute)
}

pub fn new_player(name: &str, friend_code: &str) -> NewPlayer {
    NewPlayer {
        id: PlayerId::random(),
        name: PlayerName::new(name).expect("valid name"),
        access_code_hash: AccessCode::new("K7M2PQ").expect("valid code").hash(),
        friend_code: FriendCode::parse(friend_code).expect("valid friend code"),
        session_token: SessionToken::issue(),
        balance: 20,
        created_at: at_minute(0),
    }
}

pub fn card(name: &str) -> Card {
    Card {
        name: name.to_owned(),
        set_name: "Base".to_owned(),
        rarity: "Rare Holo".to_owned(),
        image: format!("https://assets.example/base1/{name}/low.webp"),
        image_high: Some(format!("https://assets.example/base1/{name}/high.webp")),
    }
}

pub fn pull(player: PlayerId, card: Card, grade: i64, mint: bool, minute: i64) -> PullRecord {
    PullRecord {
        player_id: player,
        card,
        grade: Grade::new(grade).expect("grade in range"),
        mint,
        pulled_at: at_minute(minute),
    }
}
