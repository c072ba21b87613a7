//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use backend::domain::ports::IdentityProvider;
use backend::inbound::http::session_config::SessionSettings;
use backend::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) identity_provider: Option<Arc<dyn IdentityProvider>>,
}

impl ServerConfig {
    /// Start from validated session settings; persistence and identity run
    /// on fixtures until attached.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            bind_addr,
            db_pool: None,
            identity_provider: None,
        }
    }

    /// Attach a database connection pool for the Diesel repositories.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Verify sign-ins against this provider instead of the fixture.
    #[must_use]
    pub fn with_identity_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.identity_provider = Some(provider);
        self
    }
}
