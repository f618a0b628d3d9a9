//! JSON-RPC client for the floodwatch device gateway.
//!
//! The gateway daemon fronts the host devices an alert needs: the
//! notification surface, the siren audio sink, speech synthesis, the
//! vibration motor, and window management for click routing. This crate
//! exposes a typed client plus adapters that plug those devices into an
//! [`alert_pipeline::AlertPipeline`].
//!
//! # Example
//!
//! ```no_run
//! use device_gateway::{GatewayClient, GatewayConfig, GatewaySiren};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GatewayClient::connect(GatewayConfig::default()).await?;
//!     let siren = GatewaySiren::load(client.clone(), "/sounds/warning_siren.mp3").await?;
//!     println!("siren clip loaded: {}", siren.clip_id());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod devices;
pub mod error;
pub mod types;

pub use client::GatewayClient;
pub use config::GatewayConfig;
pub use devices::{GatewayNotifications, GatewaySiren, GatewaySpeech, GatewayVibrator};
pub use error::GatewayError;
pub use types::{ClipHandle, WindowHandle, CODE_PLAYBACK_REJECTED};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
