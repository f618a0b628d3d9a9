//! Configuration types for the feed client.

use crate::types::ChangeFilter;

/// Configuration for connecting to the Floodwatch realtime service.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Base URL of the realtime service (e.g., "http://localhost:4000").
    pub base_url: String,
    /// API key sent with every request.
    /// If None, the service is assumed to accept anonymous clients.
    pub api_key: Option<String>,
}

impl FeedConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
        }
    }

    /// Create configuration with an API key.
    pub fn with_api_key(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: Some(api_key.into()),
        }
    }

    /// Get the events endpoint URL for a channel and filter.
    pub fn events_url(&self, channel: &str, filter: &ChangeFilter) -> String {
        format!(
            "{}/api/v1/channels/{}/events?event={}&table={}",
            self.base_url,
            urlencoding::encode(channel),
            filter.event.as_str(),
            urlencoding::encode(&filter.table),
        )
    }

    /// Get the leave endpoint URL for a subscription.
    pub fn leave_url(&self, subscription_id: u64) -> String {
        format!("{}/api/v1/subscriptions/{}/leave", self.base_url, subscription_id)
    }

    /// Get the health check endpoint URL.
    pub fn check_url(&self) -> String {
        format!("{}/api/v1/check", self.base_url)
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::new("http://localhost:4000")
    }
}
