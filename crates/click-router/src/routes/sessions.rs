//! Viewer session registry routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::error::Result;
use crate::session::{self, Session};
use crate::state::AppState;

/// Request to register a viewer session.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Caller-chosen session identifier.
    pub id: String,
    /// Gateway window handle backing the session.
    pub window_id: String,
    /// Route the session is currently displaying.
    pub route: String,
}

/// Request to record a session's route change.
#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    pub route: String,
}

/// Register a session, replacing any prior registration with the same id.
pub async fn register_api(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<Session>> {
    session::register_session(
        state.store.pool(),
        &req.id,
        &req.window_id,
        &req.route,
        crate::version(),
    )
    .await?;

    let registered = session::get_session(state.store.pool(), &req.id).await?;
    info!(session = %registered.id, route = %registered.route, "Session registered");

    Ok(Json(registered))
}

/// Record a session's route change.
pub async fn update_route_api(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RouteRequest>,
) -> Result<Json<Session>> {
    session::update_route(state.store.pool(), &id, &req.route).await?;
    let updated = session::get_session(state.store.pool(), &id).await?;

    Ok(Json(updated))
}

/// Remove a closed session.
pub async fn remove_api(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    session::remove_session(state.store.pool(), &id).await?;
    info!(session = %id, "Session removed");

    Ok(StatusCode::NO_CONTENT)
}
