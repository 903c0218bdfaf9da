//! Backend entry-point: loads settings, wires adapters, and serves HTTP.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use gacha_backend::domain::ports::{CardCatalog, DisabledCardCatalog};
use gacha_backend::domain::{EconomyRules, OfflineCardPool, ThreadRngSource};
use gacha_backend::inbound::http::health::HealthState;
use gacha_backend::inbound::http::state::HttpState;
use gacha_backend::outbound::cache::CachedCardCatalog;
use gacha_backend::outbound::catalog::HttpCardCatalog;
use gacha_backend::outbound::offline_pool::load_offline_pool;
use gacha_backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};

use server::session_key::{BuildMode, load_session_key};
use server::settings::AppSettings;
use server::state_builders::{EngineParts, build_diesel_state, build_in_memory_state};
use server::{ServerConfig, create_server};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        AppSettings::load().map_err(|err| eyre!("failed to load configuration: {err}"))?;

    let key = load_session_key(
        &settings.session_key_file(),
        settings.session_allow_ephemeral(),
        BuildMode::from_debug_assertions(),
    )?;
    let bind_addr = settings.bind_addr().wrap_err("invalid bind address")?;

    let engine = build_engine(&settings)?;
    let http_state = build_store_state(&settings, engine).await?;

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(key, settings.cookie_secure(), bind_addr);
    let server = create_server(health_state, http_state, config)?;
    info!(%bind_addr, "server listening");
    server.await?;
    Ok(())
}

fn build_engine(settings: &AppSettings) -> Result<EngineParts> {
    let clock = Arc::new(DefaultClock);
    let offline_pool = Arc::new(load_pool(settings)?);

    let catalog: Arc<dyn CardCatalog> = if settings.offline_only() {
        info!("remote catalog disabled; drawing from the offline pool only");
        Arc::new(DisabledCardCatalog)
    } else {
        let base_url = settings
            .catalog_base_url()
            .wrap_err("invalid catalog base URL")?;
        let upstream = HttpCardCatalog::new(base_url, settings.catalog_timeout())
            .wrap_err("failed to build catalog client")?;
        Arc::new(CachedCardCatalog::new(
            Arc::new(upstream),
            clock.clone(),
            settings.cache_config(),
        ))
    };

    Ok(EngineParts {
        catalog,
        offline_pool,
        resolver: settings.resolver_config(),
        rules: EconomyRules::default(),
        clock,
        random: Arc::new(ThreadRngSource),
    })
}

/// The pool is mandatory only when it is the sole card source.
fn load_pool(settings: &AppSettings) -> Result<OfflineCardPool> {
    let path = settings.offline_pool_path();
    match load_offline_pool(&path) {
        Ok(pool) => Ok(pool),
        Err(error) if !settings.offline_only() => {
            warn!(%error, "offline pool unavailable; draws rely on the remote catalog");
            Ok(OfflineCardPool::default())
        }
        Err(error) => Err(error).wrap_err("offline-only mode needs a usable offline pool"),
    }
}

async fn build_store_state(settings: &AppSettings, engine: EngineParts) -> Result<HttpState> {
    let Some(database_url) = settings.database_url.as_deref() else {
        warn!("no database URL configured; state is kept in memory and lost on restart");
        return Ok(build_in_memory_state(engine));
    };

    run_migrations(database_url)
        .await
        .wrap_err("failed to apply database migrations")?;
    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
    )
    .await
    .wrap_err("failed to build database pool")?;
    Ok(build_diesel_state(&pool, engine))
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;
    use std::io::Write;

    use env_lock::lock_env;
    use gacha_backend::domain::ports::CardCatalogError;
    use gacha_backend::domain::SourceMode;
    use rstest::rstest;

    use super::*;

    fn settings_with(offline_only: &str, pool_path: &str) -> AppSettings {
        let _guard = lock_env([
            ("GACHA_OFFLINE_ONLY", Some(offline_only.to_owned())),
            ("GACHA_OFFLINE_POOL_PATH", Some(pool_path.to_owned())),
            ("GACHA_CATALOG_BASE_URL", None),
            ("GACHA_DRAW_ATTEMPTS", None),
        ]);
        AppSettings::load_from_iter([OsString::from("gacha-backend")]).expect("config should load")
    }

    fn write_pool() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(br#"[{"name": "Abra", "set": "Base", "image": "https://img/base1/43"}]"#)
            .expect("write pool");
        file
    }

    #[tokio::test]
    async fn offline_only_environment_disables_the_remote_catalog() {
        let pool = write_pool();
        let settings = settings_with("true", &pool.path().display().to_string());

        let engine = build_engine(&settings).expect("engine builds");

        assert_eq!(engine.resolver.mode, SourceMode::OfflineOnly);
        assert_eq!(engine.offline_pool.len(), 1);
        assert_eq!(
            engine.catalog.brief_list().await.expect_err("catalog disabled"),
            CardCatalogError::Disabled
        );
    }

    #[rstest]
    #[case::offline_only("true", false)]
    #[case::hybrid("false", true)]
    fn missing_pool_is_fatal_only_offline(#[case] offline_only: &str, #[case] builds: bool) {
        let dir = tempfile::tempdir().expect("temp dir");
        let absent = dir.path().join("absent.json");
        let settings = settings_with(offline_only, &absent.display().to_string());

        let engine = build_engine(&settings);

        assert_eq!(engine.is_ok(), builds);
        if let Ok(engine) = engine {
            assert!(engine.offline_pool.is_empty());
            assert_eq!(engine.resolver.mode, SourceMode::Hybrid);
        }
    }
}
