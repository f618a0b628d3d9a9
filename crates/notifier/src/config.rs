//! Configuration loaded from environment variables.

use std::env;

/// Notifier configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Change feed service URL.
    pub feed_url: String,
    /// Change feed API key, if the service requires one.
    pub feed_key: Option<String>,
    /// Feed channel to join.
    pub channel: String,
    /// Table whose INSERTs trigger alerts.
    pub table: String,
    /// Device gateway URL.
    pub gateway_url: String,
    /// Click router bind address.
    pub router_addr: String,
    /// Click router binary path.
    pub router_bin: String,
    /// Click router session store URL.
    pub router_db: String,
    /// Siren audio clip URL.
    pub siren_url: String,
    /// In-app destination notification clicks route to.
    pub click_target: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `FLOODWATCH_FEED_URL` | Change feed service URL | `http://127.0.0.1:4000` |
    /// | `FLOODWATCH_FEED_KEY` | Change feed API key | (none) |
    /// | `FLOODWATCH_CHANNEL` | Feed channel | `water-alerts` |
    /// | `FLOODWATCH_TABLE` | Watched table | `water_alerts` |
    /// | `FLOODWATCH_GATEWAY_URL` | Device gateway URL | `http://127.0.0.1:8090` |
    /// | `FLOODWATCH_ROUTER_ADDR` | Click router address | `127.0.0.1:8791` |
    /// | `FLOODWATCH_ROUTER_BIN` | Click router binary | `click-router` |
    /// | `FLOODWATCH_ROUTER_DB` | Click router store URL | `sqlite:floodwatch-router.db?mode=rwc` |
    /// | `FLOODWATCH_SIREN_URL` | Siren audio clip URL | `/audio/siren.mp3` |
    /// | `FLOODWATCH_CLICK_TARGET` | Click destination | `/dashboard` |
    pub fn from_env() -> Self {
        Self {
            feed_url: env::var("FLOODWATCH_FEED_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:4000".to_string()),
            feed_key: env::var("FLOODWATCH_FEED_KEY").ok(),
            channel: env::var("FLOODWATCH_CHANNEL")
                .unwrap_or_else(|_| "water-alerts".to_string()),
            table: env::var("FLOODWATCH_TABLE")
                .unwrap_or_else(|_| "water_alerts".to_string()),
            gateway_url: env::var("FLOODWATCH_GATEWAY_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8090".to_string()),
            router_addr: env::var("FLOODWATCH_ROUTER_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:8791".to_string()),
            router_bin: env::var("FLOODWATCH_ROUTER_BIN")
                .unwrap_or_else(|_| "click-router".to_string()),
            router_db: env::var("FLOODWATCH_ROUTER_DB")
                .unwrap_or_else(|_| "sqlite:floodwatch-router.db?mode=rwc".to_string()),
            siren_url: env::var("FLOODWATCH_SIREN_URL")
                .unwrap_or_else(|_| "/audio/siren.mp3".to_string()),
            click_target: env::var("FLOODWATCH_CLICK_TARGET")
                .unwrap_or_else(|_| "/dashboard".to_string()),
        }
    }
}
