//! Health check endpoint.

use axum::Json;
use serde::{Deserialize, Serialize};

/// Daemon health report.
#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub version: String,
}

/// Health check endpoint reporting the daemon version.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: crate::version().to_string(),
    })
}
