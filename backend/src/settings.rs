//! Application settings loaded via OrthoConfig.
//!
//! Values come from `JOBS_*` environment variables (or the matching CLI
//! flags). Session settings are read separately by
//! [`session_settings_from_env`](crate::inbound::http::session_config::session_settings_from_env).

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_RATE_LIMIT_MAX: u32 = 100;
const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 15 * 60;

/// Server, persistence and throttling configuration.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "JOBS")]
pub struct AppSettings {
    /// PostgreSQL connection string; in-memory storage when absent.
    pub database_url: Option<String>,
    /// Interface to bind.
    pub host: Option<IpAddr>,
    /// Port to bind.
    pub port: Option<u16>,
    /// Seed a demo user with sample jobs at startup.
    #[ortho_config(default = false)]
    pub seed_demo_data: bool,
    /// Requests allowed per client within one window.
    pub rate_limit_max: Option<u32>,
    /// Rate limit window length in seconds.
    pub rate_limit_window_secs: Option<u64>,
    /// Key the rate limiter on `Forwarded`/`X-Forwarded-For` instead of the
    /// peer address. Enable only behind a proxy that sets those headers.
    #[ortho_config(default = false)]
    pub trust_proxy: bool,
}

impl AppSettings {
    /// Address to bind, defaulting to `0.0.0.0:3000`.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    /// Requests per window, defaulting to 100.
    #[must_use]
    pub fn rate_limit_max(&self) -> u32 {
        self.rate_limit_max.unwrap_or(DEFAULT_RATE_LIMIT_MAX)
    }

    /// Window length, defaulting to fifteen minutes.
    #[must_use]
    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(
            self.rate_limit_window_secs
                .unwrap_or(DEFAULT_RATE_LIMIT_WINDOW_SECS),
        )
    }
}
