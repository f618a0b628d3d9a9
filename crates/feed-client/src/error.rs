//! Error types for feed-client.

use thiserror::Error;

/// Errors that can occur when interacting with the realtime feed service.
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// SSE stream error.
    #[error("SSE error: {0}")]
    Sse(String),

    /// Connection to the feed service failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Feed service health check failed.
    #[error("Health check failed")]
    HealthCheckFailed,

    /// Server never acknowledged the subscription.
    #[error("No subscription acknowledgement within {0:?}")]
    HandshakeTimeout(std::time::Duration),

    /// The event stream ended.
    #[error("Stream closed")]
    Closed,

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
