//! sbr-daemon entry point.
//!
//! Intentionally thin: tracing, config, DB pool, client wiring, then the
//! poll loop in `runner.rs` until shutdown.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use sbr_chain::LedgerRestClient;
use sbr_config::WatcherSettings;
use sbr_daemon::{runner, store::PgTradeStore};
use sbr_engine::Engine;
use tracing::info;

const DEFAULT_CONFIG_PATH: &str = "config/supply-bridge.yaml";
const LOCAL_OVERRIDE_PATH: &str = "config/supply-bridge.local.yaml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Dev convenience; production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let base = std::env::var("SBR_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let loaded =
        sbr_config::load_layered_yaml(&[Path::new(&base), Path::new(LOCAL_OVERRIDE_PATH)])
            .context("config load failed")?;
    let settings = WatcherSettings::from_config(&loaded.config_json)?;
    info!(
        config_hash = %loaded.config_hash,
        contract = %settings.contract_address,
        page_size = settings.page_size,
        poll_interval_seconds = settings.poll_interval_seconds,
        "configuration loaded"
    );

    let pool = sbr_db::connect_from_env().await?;
    sbr_db::migrate(&pool).await?;
    let db = sbr_db::status(&pool).await?;
    if !db.ok || !db.has_processed_trades_table {
        bail!("database not ready: {db:?}");
    }
    let already_processed = sbr_db::count_processed(&pool).await?;
    info!(already_processed, "database ready");

    let client = Arc::new(LedgerRestClient::new(&settings)?);
    let engine = Arc::new(Engine::new(
        client.clone(),
        client.clone(),
        client,
        Arc::new(PgTradeStore::new(pool)),
        settings.page_size,
    ));

    runner::run_until_shutdown(engine, Duration::from_secs(settings.poll_interval_seconds))
        .await;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
