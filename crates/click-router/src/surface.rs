//! Window and notification actions taken while routing a click.

use async_trait::async_trait;
use device_gateway::{GatewayClient, WindowHandle};

use crate::error::RouterError;

/// Trait for the outward actions click routing performs.
///
/// Abstracted to support different hosts (device gateway, tests).
#[async_trait]
pub trait ClickSurface: Send + Sync {
    /// Dismiss the notification with the given tag.
    async fn dismiss(&self, tag: &str) -> Result<(), RouterError>;

    /// Bring the window with the given id to the foreground.
    async fn focus(&self, window_id: &str) -> Result<(), RouterError>;

    /// Open a new window at `target`.
    async fn open(&self, target: &str) -> Result<WindowHandle, RouterError>;
}

/// Click surface backed by the device gateway.
#[derive(Debug, Clone)]
pub struct GatewaySurface {
    client: GatewayClient,
}

impl GatewaySurface {
    /// Create a surface over `client`.
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ClickSurface for GatewaySurface {
    async fn dismiss(&self, tag: &str) -> Result<(), RouterError> {
        Ok(self.client.dismiss_notification(tag).await?)
    }

    async fn focus(&self, window_id: &str) -> Result<(), RouterError> {
        Ok(self.client.focus_window(window_id).await?)
    }

    async fn open(&self, target: &str) -> Result<WindowHandle, RouterError> {
        Ok(self.client.open_window(target).await?)
    }
}
