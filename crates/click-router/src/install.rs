//! Daemon installation with immediate-takeover semantics.
//!
//! `ensure_installed` guarantees a click router of the current version is
//! answering on the configured address before it returns: a matching daemon
//! is reused, an older one is told to shut down and replaced without
//! waiting for its outstanding work, and a missing one is spawned. The
//! replacement daemon claims all persisted sessions at startup, so it
//! routes the very next click.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::RouterError;
use crate::routes::health::Health;

/// How long to wait for a spawned daemon to answer health checks.
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for installing the click router daemon.
#[derive(Debug, Clone)]
pub struct InstallConfig {
    /// Path to the click-router binary.
    pub binary: PathBuf,
    /// Address the daemon should answer on (e.g., "127.0.0.1:8791").
    pub addr: String,
    /// SQLite session store URL handed to the daemon.
    pub database_url: String,
    /// Device gateway URL handed to the daemon.
    pub gateway_url: String,
    /// Default click destination handed to the daemon.
    pub default_target: String,
}

impl InstallConfig {
    /// Create an install config with required fields.
    pub fn new(binary: impl Into<PathBuf>, addr: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            addr: addr.into(),
            database_url: "sqlite:floodwatch-router.db?mode=rwc".to_string(),
            gateway_url: "http://127.0.0.1:8090".to_string(),
            default_target: "/dashboard".to_string(),
        }
    }

    /// Set the SQLite session store URL.
    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = url.into();
        self
    }

    /// Set the device gateway URL.
    pub fn with_gateway_url(mut self, url: impl Into<String>) -> Self {
        self.gateway_url = url.into();
        self
    }

    /// Set the default click destination.
    pub fn with_default_target(mut self, target: impl Into<String>) -> Self {
        self.default_target = target.into();
        self
    }

    /// Base URL for reaching the daemon.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// How `ensure_installed` satisfied the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Installed {
    /// A daemon of the current version was already answering.
    Reused,
    /// An older daemon was shut down and a current one spawned.
    Replaced,
    /// No daemon was answering; a current one was spawned.
    Spawned,
}

/// Ensure a click router of the current version is answering on `config.addr`.
pub async fn ensure_installed(config: &InstallConfig) -> Result<Installed, RouterError> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()?;
    let health_url = format!("{}/healthz", config.base_url());

    match fetch_health(&http, &health_url).await {
        Some(running) if running.version == crate::version() => {
            info!(version = %running.version, "Click router already installed");
            Ok(Installed::Reused)
        }
        Some(running) => {
            info!(
                old = %running.version,
                new = crate::version(),
                "Replacing click router"
            );

            let shutdown_url = format!("{}/v1/shutdown", config.base_url());
            if let Err(err) = http.post(&shutdown_url).send().await {
                warn!("Shutdown request to old router failed: {}", err);
            }
            // Wait only for the old listener to release the port, not for
            // its outstanding work to drain.
            wait_unreachable(&http, &health_url, Duration::from_secs(5)).await;

            spawn_router(config)?;
            wait_ready(&http, &health_url, DEFAULT_READY_TIMEOUT).await?;
            Ok(Installed::Replaced)
        }
        None => {
            spawn_router(config)?;
            wait_ready(&http, &health_url, DEFAULT_READY_TIMEOUT).await?;
            Ok(Installed::Spawned)
        }
    }
}

/// Fetch the health report of a running daemon, if any.
async fn fetch_health(http: &reqwest::Client, url: &str) -> Option<Health> {
    match http.get(url).send().await {
        Ok(resp) if resp.status().is_success() => resp.json().await.ok(),
        _ => None,
    }
}

/// Spawn the daemon binary, detached. Returns the child PID.
///
/// The child handle is dropped without killing: the daemon must outlive
/// the installing process.
fn spawn_router(config: &InstallConfig) -> Result<u32, RouterError> {
    let mut cmd = Command::new(&config.binary);
    cmd.env("FLOODWATCH_ROUTER_ADDR", &config.addr)
        .env("FLOODWATCH_ROUTER_DB", &config.database_url)
        .env("FLOODWATCH_GATEWAY_URL", &config.gateway_url)
        .env("FLOODWATCH_CLICK_TARGET", &config.default_target)
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    info!(
        "Spawning click router: {:?} on {}",
        config.binary, config.addr
    );

    let child = cmd.spawn().map_err(|err| {
        RouterError::Spawn(format!("Failed to spawn {:?}: {}", config.binary, err))
    })?;

    let pid = child.id();
    debug!("Click router started with PID {}", pid);

    Ok(pid)
}

/// Wait for the daemon to answer health checks.
async fn wait_ready(
    http: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<(), RouterError> {
    let start = std::time::Instant::now();
    let poll_interval = Duration::from_millis(100);

    info!("Waiting for click router to be ready at {}...", url);

    loop {
        if start.elapsed() > timeout {
            return Err(RouterError::NotReady(format!(
                "Router not ready after {:?}",
                timeout
            )));
        }

        match http.get(url).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("Click router is ready");
                return Ok(());
            }
            Ok(_) => {
                debug!("Health check returned non-success, retrying...");
            }
            Err(err) => {
                debug!("Health check failed: {}, retrying...", err);
            }
        }

        sleep(poll_interval).await;
    }
}

/// Wait until `url` stops answering, or `timeout` elapses. Best effort.
async fn wait_unreachable(http: &reqwest::Client, url: &str, timeout: Duration) {
    let start = std::time::Instant::now();
    let poll_interval = Duration::from_millis(100);

    while start.elapsed() < timeout {
        if http.get(url).send().await.is_err() {
            return;
        }
        sleep(poll_interval).await;
    }

    warn!("Old router still answering after {:?}", timeout);
}
