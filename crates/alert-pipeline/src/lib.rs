//! Real-time threshold-alert pipeline.
//!
//! Subscribes to the water-alert change feed and fans each inserted event
//! out to four output channels: a vibration pattern, a system notification,
//! the siren clip, and a spoken warning that starts two seconds after the
//! siren.
//!
//! Device handles are injected at construction, so hosts decide what is
//! real hardware, what goes through the device gateway, and what is a null
//! output.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use alert_pipeline::{AlertPipeline, Devices, PipelineConfig};
//! use feed_client::{FeedClient, FeedConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let feed = FeedClient::connect(FeedConfig::default()).await?;
//! let mut pipeline = AlertPipeline::new(
//!     Arc::new(feed),
//!     Devices::null(),
//!     PipelineConfig::default(),
//! );
//!
//! pipeline.activate().await?;
//! // ... host runs ...
//! pipeline.deactivate().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod devices;
pub mod error;
pub mod fanout;
pub mod feed;
pub mod pipeline;

pub use config::PipelineConfig;
pub use devices::{
    Devices, Notification, NotificationData, NotificationSurface, NullNotificationSurface,
    NullSiren, NullSpeech, NullVibrator, PermissionState, SirenClip, SpeechSynth, Utterance,
    Vibrator,
};
pub use error::{DeviceError, PipelineError};
pub use fanout::{NOTIFICATION_TAG, NOTIFICATION_TITLE, SPEECH_DELAY, VIBRATION_PATTERN};
pub use feed::{AlertFeed, FeedSubscription};
pub use pipeline::{AlertPipeline, PipelineState};

pub use feed_client::{AlertEvent, ChangeFilter, FeedError};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
