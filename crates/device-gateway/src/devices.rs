//! Gateway-backed implementations of the alert pipeline device traits.

use std::time::Duration;

use alert_pipeline::{
    DeviceError, Notification, NotificationSurface, PermissionState, SirenClip, SpeechSynth,
    Utterance, Vibrator,
};
use async_trait::async_trait;

use crate::client::GatewayClient;
use crate::error::GatewayError;
use crate::types::ClipHandle;

/// Notification surface backed by the device gateway.
#[derive(Debug, Clone)]
pub struct GatewayNotifications {
    client: GatewayClient,
}

impl GatewayNotifications {
    /// Create a notification surface over `client`.
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NotificationSurface for GatewayNotifications {
    async fn permission_state(&self) -> Result<PermissionState, DeviceError> {
        Ok(self.client.permission_state().await?)
    }

    async fn request_permission(&self) -> Result<PermissionState, DeviceError> {
        Ok(self.client.request_permission().await?)
    }

    async fn show(&self, notification: Notification) -> Result<(), DeviceError> {
        Ok(self.client.show_notification(&notification).await?)
    }
}

/// An audio clip loaded on the gateway, playable as the siren.
#[derive(Debug, Clone)]
pub struct GatewaySiren {
    client: GatewayClient,
    clip: ClipHandle,
}

impl GatewaySiren {
    /// Load the clip at `url` on the gateway and wrap its handle.
    pub async fn load(client: GatewayClient, url: &str) -> Result<Self, GatewayError> {
        let clip = client.load_audio_clip(url).await?;
        Ok(Self { client, clip })
    }

    /// The gateway-assigned id of the loaded clip.
    pub fn clip_id(&self) -> &str {
        &self.clip.clip_id
    }
}

#[async_trait]
impl SirenClip for GatewaySiren {
    async fn seek(&self, position: Duration) -> Result<(), DeviceError> {
        Ok(self.client.seek(&self.clip.clip_id, position).await?)
    }

    async fn set_volume(&self, volume: f64) -> Result<(), DeviceError> {
        Ok(self.client.set_volume(&self.clip.clip_id, volume).await?)
    }

    async fn play(&self) -> Result<(), DeviceError> {
        Ok(self.client.play(&self.clip.clip_id).await?)
    }

    async fn pause(&self) -> Result<(), DeviceError> {
        Ok(self.client.pause(&self.clip.clip_id).await?)
    }
}

/// Speech synthesizer backed by the device gateway.
#[derive(Debug, Clone)]
pub struct GatewaySpeech {
    client: GatewayClient,
}

impl GatewaySpeech {
    /// Create a speech synthesizer over `client`.
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SpeechSynth for GatewaySpeech {
    async fn speak(&self, utterance: Utterance) -> Result<(), DeviceError> {
        Ok(self.client.speak(&utterance).await?)
    }

    async fn cancel(&self) -> Result<(), DeviceError> {
        Ok(self.client.cancel_speech().await?)
    }
}

/// Vibration motor backed by the device gateway.
#[derive(Debug, Clone)]
pub struct GatewayVibrator {
    client: GatewayClient,
}

impl GatewayVibrator {
    /// Create a vibrator over `client`.
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Vibrator for GatewayVibrator {
    async fn vibrate(&self, pattern: &[u64]) -> Result<bool, DeviceError> {
        Ok(self.client.vibrate(pattern).await?)
    }
}
