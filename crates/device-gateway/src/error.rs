//! Error types for device-gateway.

use alert_pipeline::DeviceError;
use thiserror::Error;

use crate::types::CODE_PLAYBACK_REJECTED;

/// Errors that can occur when talking to the device gateway daemon.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON-RPC error response from the gateway.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i32, message: String },

    /// Connection to the gateway failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Gateway health check failed.
    #[error("Health check failed")]
    HealthCheckFailed,

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<GatewayError> for DeviceError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::Rpc {
                code: CODE_PLAYBACK_REJECTED,
                message,
            } => DeviceError::PlaybackRejected(message),
            GatewayError::Rpc { code, message } => {
                DeviceError::Failed(format!("RPC error {}: {}", code, message))
            }
            GatewayError::Http(e) => DeviceError::Unavailable(format!("HTTP error: {}", e)),
            GatewayError::Connection(reason) => DeviceError::Unavailable(reason),
            GatewayError::HealthCheckFailed => {
                DeviceError::Unavailable("health check failed".to_string())
            }
            other => DeviceError::Failed(other.to_string()),
        }
    }
}
