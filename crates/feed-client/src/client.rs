//! HTTP client for the realtime feed service.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use reqwest_eventsource::RequestBuilderExt;
use tracing::{debug, info, warn};

use crate::config::FeedConfig;
use crate::error::FeedError;
use crate::sse::{EventStream, ReconnectConfig, Subscription};
use crate::types::ChangeFilter;

fn build_client(config: &FeedConfig, timeout: Option<Duration>) -> Result<Client, FeedError> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(key) = &config.api_key {
        let mut value = HeaderValue::from_str(key)
            .map_err(|e| FeedError::Config(format!("invalid API key: {}", e)))?;
        value.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert("apikey", value);
        builder = builder.default_headers(headers);
    }
    builder.build().map_err(FeedError::Http)
}

/// Client for the realtime feed service.
#[derive(Clone)]
pub struct FeedClient {
    http: Client,
    config: FeedConfig,
    connected: Arc<AtomicBool>,
}

impl FeedClient {
    /// Connect to the feed service.
    pub async fn connect(config: FeedConfig) -> Result<Self, FeedError> {
        let http = build_client(&config, Some(Duration::from_secs(30)))?;

        let client = Self {
            http,
            config,
            connected: Arc::new(AtomicBool::new(false)),
        };

        // Verify connection with health check
        if client.health_check().await? {
            client.connected.store(true, Ordering::SeqCst);
            info!("Connected to feed service at {}", client.config.base_url);
        } else {
            return Err(FeedError::HealthCheckFailed);
        }

        Ok(client)
    }

    /// Connect to the feed service, retrying with backoff.
    ///
    /// Used at boot, when the feed service may still be coming up.
    pub async fn connect_with_retry(
        config: FeedConfig,
        reconnect: ReconnectConfig,
    ) -> Result<Self, FeedError> {
        let mut attempts = 0u32;
        loop {
            match Self::connect(config.clone()).await {
                Ok(client) => return Ok(client),
                Err(e) => {
                    if !reconnect.should_retry(attempts) {
                        return Err(e);
                    }
                    let delay = reconnect.delay_for_attempt(attempts);
                    warn!(
                        "Feed connection failed ({}), retrying in {:?}",
                        e, delay
                    );
                    tokio::time::sleep(delay).await;
                    attempts += 1;
                }
            }
        }
    }

    /// Check if currently connected to the feed service.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Perform a health check against the feed service.
    pub async fn health_check(&self) -> Result<bool, FeedError> {
        let url = self.config.check_url();
        debug!("Health check: {}", url);

        match self.http.get(&url).send().await {
            Ok(resp) => {
                let ok = resp.status().is_success();
                self.connected.store(ok, Ordering::SeqCst);
                Ok(ok)
            }
            Err(e) => {
                self.connected.store(false, Ordering::SeqCst);
                Err(FeedError::Http(e))
            }
        }
    }

    /// Subscribe to changes on a channel.
    ///
    /// Opens an SSE connection and waits for the server to acknowledge the
    /// subscription before returning.
    pub async fn subscribe(
        &self,
        channel: &str,
        filter: ChangeFilter,
    ) -> Result<Subscription, FeedError> {
        let url = self.config.events_url(channel, &filter);
        info!("Creating SSE connection to {}", url);

        // SSE connections are long-lived and must not use the request timeout
        let sse_client = build_client(&self.config, None)?;
        let event_source = sse_client
            .get(&url)
            .eventsource()
            .map_err(|e| FeedError::Connection(e.to_string()))?;

        let stream = EventStream::new(event_source, filter);
        Subscription::establish(stream, self.http.clone(), &self.config).await
    }

    /// Get the configuration.
    pub fn config(&self) -> &FeedConfig {
        &self.config
    }
}

impl std::fmt::Debug for FeedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedClient")
            .field("config", &self.config)
            .field("connected", &self.is_connected())
            .finish()
    }
}
