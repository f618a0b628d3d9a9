//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

/// Click router daemon configuration.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite session store URL.
    pub database_url: String,
    /// Device gateway URL.
    pub gateway_url: String,
    /// Destination used when a click carries no target.
    pub default_target: String,
}

impl RouterConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `FLOODWATCH_ROUTER_ADDR` | Server bind address | `127.0.0.1:8791` |
    /// | `FLOODWATCH_ROUTER_DB` | SQLite session store URL | `sqlite:floodwatch-router.db?mode=rwc` |
    /// | `FLOODWATCH_GATEWAY_URL` | Device gateway URL | `http://127.0.0.1:8090` |
    /// | `FLOODWATCH_CLICK_TARGET` | Default click destination | `/dashboard` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("FLOODWATCH_ROUTER_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8791".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("FLOODWATCH_ROUTER_DB")
            .unwrap_or_else(|_| "sqlite:floodwatch-router.db?mode=rwc".to_string());

        let gateway_url = env::var("FLOODWATCH_GATEWAY_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8090".to_string());

        let default_target =
            env::var("FLOODWATCH_CLICK_TARGET").unwrap_or_else(|_| "/dashboard".to_string());

        Ok(Self {
            addr,
            database_url,
            gateway_url,
            default_target,
        })
    }

    /// Base URL the daemon answers on, derived from the bind address.
    pub fn public_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid FLOODWATCH_ROUTER_ADDR format")]
    InvalidAddr,
}
