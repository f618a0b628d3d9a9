//! Change-feed subscription client for the Floodwatch backend.
//!
//! This crate provides a Rust client for the Floodwatch realtime service,
//! which pushes row-insert notifications for monitored tables over a
//! persistent connection. It supports:
//!
//! - Opening filtered subscriptions (one table, insert events only)
//! - Receiving inserted rows as a stream of [`AlertEvent`]s
//! - Explicit unsubscribe with a server-side leave
//! - Health checking and connection monitoring
//!
//! # Example
//!
//! ```no_run
//! use feed_client::{ChangeFilter, FeedClient, FeedConfig};
//!
//! # async fn example() -> Result<(), feed_client::FeedError> {
//! // Connect to the realtime service
//! let config = FeedConfig::default();
//! let client = FeedClient::connect(config).await?;
//!
//! // Subscribe to inserts on the alert table
//! let filter = ChangeFilter::inserts("water_alerts");
//! let mut subscription = client.subscribe("water-alerts", filter).await?;
//!
//! while let Some(result) = subscription.next_event().await {
//!     match result {
//!         Ok(event) => println!("water level: {}", event.water_level),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod sse;
pub mod types;

pub use client::FeedClient;
pub use config::FeedConfig;
pub use error::FeedError;
pub use sse::{EventStream, ReconnectConfig, Subscription};
pub use types::{AlertEvent, ChangeEventKind, ChangeFilter, SubscriptionId};

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
