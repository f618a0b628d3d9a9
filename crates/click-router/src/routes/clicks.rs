//! Notification click routing.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::session;
use crate::state::AppState;
use crate::store::RouterStore;
use crate::surface::ClickSurface;

/// A notification click delivered by the gateway.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickRequest {
    /// Tag of the clicked notification.
    pub tag: String,
    /// Destination carried in the notification payload, if any.
    #[serde(default)]
    pub target: Option<String>,
}

/// What routing did with the click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickAction {
    /// An existing session was brought to the foreground.
    Focused,
    /// A new window was opened at the target.
    Opened,
}

/// Routing outcome returned to the gateway.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickResponse {
    pub action: ClickAction,
    /// Session that was focused, when `action` is `focused`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Window that was opened, when `action` is `opened`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_id: Option<String>,
}

/// Route a notification click.
///
/// Dismisses the notification, then focuses a session already displaying
/// the target route. Sessions whose window the surface can no longer focus
/// are pruned and skipped. When no session matches, exactly one new window
/// is opened at the target.
pub async fn route_click(
    store: &RouterStore,
    surface: &dyn ClickSurface,
    default_target: &str,
    req: ClickRequest,
) -> Result<ClickResponse> {
    info!(tag = %req.tag, "Routing notification click");

    if let Err(err) = surface.dismiss(&req.tag).await {
        warn!(tag = %req.tag, "Failed to dismiss notification: {}", err);
    }

    let target = req
        .target
        .unwrap_or_else(|| default_target.to_string());

    let candidates = session::find_sessions_by_route(store.pool(), &target).await?;
    for candidate in candidates {
        match surface.focus(&candidate.window_id).await {
            Ok(()) => {
                info!(session = %candidate.id, target = %target, "Focused existing session");
                return Ok(ClickResponse {
                    action: ClickAction::Focused,
                    session_id: Some(candidate.id),
                    window_id: None,
                });
            }
            Err(err) => {
                warn!(
                    session = %candidate.id,
                    "Session window unreachable, pruning: {}",
                    err
                );
                if let Err(err) = session::remove_session(store.pool(), &candidate.id).await {
                    warn!(session = %candidate.id, "Failed to prune session: {}", err);
                }
            }
        }
    }

    let window = surface.open(&target).await?;
    info!(window = %window.window_id, target = %target, "Opened new window");

    Ok(ClickResponse {
        action: ClickAction::Opened,
        session_id: None,
        window_id: Some(window.window_id),
    })
}

/// Handle a notification click callback.
pub async fn click_api(
    State(state): State<AppState>,
    Json(req): Json<ClickRequest>,
) -> Result<Json<ClickResponse>> {
    let response = route_click(
        &state.store,
        state.surface.as_ref(),
        &state.default_target,
        req,
    )
    .await?;

    Ok(Json(response))
}
