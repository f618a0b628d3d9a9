//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::watch;

use crate::store::RouterStore;
use crate::surface::ClickSurface;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Session store.
    pub store: RouterStore,
    /// Window and notification actions.
    pub surface: Arc<dyn ClickSurface>,
    /// Destination used when a click carries no target.
    pub default_target: String,
    /// Stops the server when a newer controller takes over the address.
    pub shutdown: Arc<watch::Sender<bool>>,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        store: RouterStore,
        surface: Arc<dyn ClickSurface>,
        default_target: impl Into<String>,
        shutdown: watch::Sender<bool>,
    ) -> Self {
        Self {
            store,
            surface,
            default_target: default_target.into(),
            shutdown: Arc::new(shutdown),
        }
    }
}
