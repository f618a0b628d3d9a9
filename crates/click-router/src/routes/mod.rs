//! Route handlers for the click router daemon.

pub mod clicks;
pub mod health;
pub mod sessions;
pub mod shutdown;

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/healthz", get(health::health))
        // Notification click callback from the gateway
        .route("/v1/clicks", post(clicks::click_api))
        // Viewer session registry
        .route("/v1/sessions", post(sessions::register_api))
        .route("/v1/sessions/:id/route", put(sessions::update_route_api))
        .route("/v1/sessions/:id", delete(sessions::remove_api))
        // Controller replacement
        .route("/v1/shutdown", post(shutdown::shutdown_api))
}
