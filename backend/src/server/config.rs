//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use jobs_tracker::inbound::http::session_config::SessionSettings;
use jobs_tracker::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) rate_limit_max: u32,
    pub(crate) rate_limit_window: Duration,
    pub(crate) trust_proxy: bool,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration from validated session settings.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            rate_limit_max: 100,
            rate_limit_window: Duration::from_secs(15 * 60),
            trust_proxy: false,
            db_pool: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without one the server keeps all data in memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Override the per-client request budget.
    #[must_use]
    pub const fn with_rate_limit(mut self, max_requests: u32, window: Duration) -> Self {
        self.rate_limit_max = max_requests;
        self.rate_limit_window = window;
        self
    }

    /// Key the rate limiter on the proxy-reported client address.
    #[must_use]
    pub const fn with_trusted_proxy(mut self, trust_proxy: bool) -> Self {
        self.trust_proxy = trust_proxy;
        self
    }

    /// Address the server binds to.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
