//! Controlled shutdown, used when a newer controller replaces this one.

use axum::extract::State;
use axum::Json;
use tracing::info;

use crate::state::AppState;

/// Stop the daemon so a newer controller can take over the address.
pub async fn shutdown_api(State(state): State<AppState>) -> Json<serde_json::Value> {
    info!("Shutdown requested, handing the address to a newer controller");
    let _ = state.shutdown.send(true);

    Json(serde_json::json!({ "status": "shutting down" }))
}
