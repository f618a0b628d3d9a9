//! Error types for alert-pipeline.

use thiserror::Error;

use crate::pipeline::PipelineState;

/// Errors reported by an output device.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The device or its gateway is not available on this host.
    #[error("Device unavailable: {0}")]
    Unavailable(String),

    /// The host refused to start playback.
    #[error("Playback rejected: {0}")]
    PlaybackRejected(String),

    /// The device call failed.
    #[error("Device call failed: {0}")]
    Failed(String),
}

/// Errors that can occur in the alert pipeline lifecycle.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Opening the change-feed subscription failed.
    #[error("Subscription failed: {0}")]
    Subscribe(#[from] feed_client::FeedError),

    /// A lifecycle method was called in the wrong state.
    #[error("Pipeline is {actual:?}, expected {expected:?}")]
    InvalidState {
        expected: PipelineState,
        actual: PipelineState,
    },
}
