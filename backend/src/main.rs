//! Backend entry-point: loads settings, applies migrations and serves the
//! BookLink HTTP API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::inbound::http::session_config::fingerprint::key_fingerprint;
use backend::inbound::http::session_config::{BuildMode, SessionToggles, session_settings};
use backend::outbound::identity::{HttpIdentityProvider, IdentityProviderConfig};
use backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use backend::settings::AppSettings;
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

    let settings = AppSettings::load().map_err(|error| eyre!("failed to load settings: {error}"))?;
    let session = session_settings(
        &SessionToggles::from_settings(&settings),
        BuildMode::from_debug_assertions(),
    )
    .wrap_err("invalid session configuration")?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        cookie_secure = session.cookie_secure,
        "session key loaded"
    );

    let bind_addr = settings.bind_addr()?;
    let mut config = ServerConfig::new(session, bind_addr);

    if let Some(database_url) = settings.database_url.clone() {
        let migration_url = database_url.clone();
        let applied = tokio::task::spawn_blocking(move || run_migrations(&migration_url))
            .await
            .wrap_err("migration task panicked")?
            .wrap_err("failed to apply migrations")?;
        info!(applied, "database schema up to date");
        let pool = DbPool::new(PoolConfig::from_settings(database_url, &settings))
            .await
            .wrap_err("failed to create database pool")?;
        config = config.with_db_pool(pool);
    }

    if let Some(identity) = IdentityProviderConfig::from_settings(&settings)? {
        info!(base_url = %identity.base_url, "verifying sign-ins with identity provider");
        config = config.with_identity_provider(Arc::new(HttpIdentityProvider::new(identity)?));
    }

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting server");
    create_server(health_state, config)?.await?;
    Ok(())
}
