//! Background notification click routing for Floodwatch.
//!
//! Clicking a flood alert notification must work even after the page that
//! raised it is gone, so routing runs in this standalone daemon rather than
//! in any viewer process. Viewer sessions register their window and current
//! route; when the gateway reports a click, the daemon dismisses the
//! notification, focuses a session already at the target route, or opens
//! exactly one new window. The session table is persisted in SQLite and
//! survives daemon restarts.
//!
//! # Example
//!
//! ```no_run
//! use click_router::{ensure_installed, InstallConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = InstallConfig::new("click-router", "127.0.0.1:8791");
//!     let installed = ensure_installed(&config).await?;
//!     println!("router installed: {:?}", installed);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod install;
pub mod routes;
pub mod session;
pub mod state;
pub mod store;
pub mod surface;

pub use config::RouterConfig;
pub use error::{Result, RouterError};
pub use install::{ensure_installed, InstallConfig, Installed};
pub use routes::clicks::{route_click, ClickAction, ClickRequest, ClickResponse};
pub use session::Session;
pub use state::AppState;
pub use store::RouterStore;
pub use surface::{ClickSurface, GatewaySurface};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
