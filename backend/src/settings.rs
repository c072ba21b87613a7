//! Application settings loaded via OrthoConfig.
//!
//! Every value can come from the command line, a `BOOKLINK_*` environment
//! variable or a configuration file. Unset values fall back to the defaults
//! exposed by the accessor methods.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_POOL_MIN_IDLE: u32 = 2;
const DEFAULT_IDENTITY_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Start-up configuration for the BookLink backend.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BOOKLINK")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL. Without one the server runs on fixtures.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    pub db_pool_max_size: Option<u32>,
    /// Idle connections kept open by the pool.
    pub db_pool_min_idle: Option<u32>,
    /// Base URL of the hosted identity provider.
    pub identity_provider_url: Option<String>,
    /// API key sent to the identity provider.
    pub identity_provider_api_key: Option<String>,
    /// Request timeout for identity provider calls, in seconds.
    pub identity_provider_timeout_secs: Option<u64>,
    /// File holding the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Raw `Secure` cookie toggle; validated per build mode.
    pub session_cookie_secure: Option<String>,
    /// Raw `SameSite` policy; validated per build mode.
    pub session_same_site: Option<String>,
    /// Raw toggle allowing a generated key when the key file is missing.
    pub session_allow_ephemeral: Option<String>,
}

/// Failure to interpret an [`AppSettings`] value.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The bind address does not parse as `host:port`.
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

impl AppSettings {
    /// Resolved bind address.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddr`] when the configured value does not
    /// parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    pub fn db_pool_max_size(&self) -> u32 {
        self.db_pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    pub fn db_pool_min_idle(&self) -> u32 {
        self.db_pool_min_idle.unwrap_or(DEFAULT_POOL_MIN_IDLE)
    }

    pub fn identity_provider_timeout(&self) -> Duration {
        Duration::from_secs(
            self.identity_provider_timeout_secs
                .unwrap_or(DEFAULT_IDENTITY_TIMEOUT_SECS),
        )
    }

    /// Path of the session key file, falling back to the mounted secret.
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }
}
