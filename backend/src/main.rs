//! Blog entry-point: loads configuration, prepares persistence and serves HTTP.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use blog::inbound::http::health::HealthState;
use blog::inbound::http::session_config::{BuildMode, key_fingerprint, session_settings};
use blog::outbound::persistence::{DbPool, PoolConfig, ensure_schema};
use blog::settings::BlogSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
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

    let settings = BlogSettings::load().wrap_err("loading configuration")?;
    let session = session_settings(
        &settings.session_toggles(),
        BuildMode::from_debug_assertions(),
    )
    .wrap_err("validating session settings")?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        "session key loaded"
    );

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        settings.bind_addr()?,
    );
    match settings.database_url() {
        Some(url) => {
            let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.pool_size()))
                .await
                .wrap_err("creating database pool")?;
            ensure_schema(&pool)
                .await
                .wrap_err("applying baseline schema")?;
            config = config.with_db_pool(pool);
        }
        None => warn!("no database configured; using the in-process store"),
    }

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await?;
    Ok(())
}
