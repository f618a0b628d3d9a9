//! Error types for the click router.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Errors that can occur while routing clicks or managing the daemon.
#[derive(Debug, Error)]
pub enum RouterError {
    /// SQLx error (connection, query, etc.)
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration error
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Record not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Device gateway error
    #[error("gateway error: {0}")]
    Gateway(#[from] device_gateway::GatewayError),

    /// HTTP error talking to a running daemon
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to spawn the daemon binary
    #[error("failed to spawn router: {0}")]
    Spawn(String),

    /// Daemon did not come up in time
    #[error("router not ready: {0}")]
    NotReady(String),
}

impl IntoResponse for RouterError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            RouterError::NotFound { .. } => (StatusCode::NOT_FOUND, self.to_string()),
            RouterError::Gateway(err) => {
                tracing::error!("Gateway error: {}", err);
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            other => {
                tracing::error!("Internal error: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
            }
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;
