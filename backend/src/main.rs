//! Jobs tracker entry-point: loads configuration, prepares storage and
//! serves the HTML application.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use jobs_tracker::inbound::http::health::HealthState;
use jobs_tracker::inbound::http::session_config::{BuildMode, session_settings_from_env};
use jobs_tracker::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use jobs_tracker::settings::AppSettings;

use server::{ServerConfig, build_http_state, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("invalid configuration: {e}")))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    let mut config = ServerConfig::new(session, settings.bind_addr())
        .with_rate_limit(settings.rate_limit_max(), settings.rate_limit_window())
        .with_trusted_proxy(settings.trust_proxy);
    if let Some(url) = settings.database_url.as_deref() {
        run_pending_migrations(url)
            .await
            .map_err(std::io::Error::other)?;
        let pool = DbPool::new(PoolConfig::new(url))
            .await
            .map_err(std::io::Error::other)?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let http_state = build_http_state(&config, settings.seed_demo_data).await;
    let bind_addr = config.bind_addr();
    let server = create_server(health_state, http_state, config)?;
    info!(%bind_addr, "server listening");
    server.await
}
