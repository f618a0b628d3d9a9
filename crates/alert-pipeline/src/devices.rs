//! Output-device seams for the alert fan-out.
//!
//! The pipeline never talks to notification, audio, speech, or vibration
//! hardware directly. It is handed one handle per channel at construction,
//! which keeps every channel replaceable with a test double and lets a host
//! without some device substitute the null implementation for it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DeviceError;

/// Notification permission as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    /// The user has allowed notifications.
    Granted,
    /// The user has blocked notifications.
    Denied,
    /// The user has not decided yet.
    Default,
}

/// A system notification ready for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Notification title.
    pub title: String,

    /// Body text.
    pub body: String,

    /// Icon shown next to the notification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Small badge icon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,

    /// Vibration pattern delivered with the notification.
    pub vibrate: Vec<u64>,

    /// Replacement tag. A new notification with the same tag replaces the
    /// old one instead of stacking in the tray.
    pub tag: String,

    /// Alert the user again even when replacing a notification by tag.
    pub renotify: bool,

    /// Payload used to route a click back into the application.
    pub data: NotificationData,
}

/// Click-routing payload attached to a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationData {
    /// In-app destination the click opens or focuses.
    pub click_target: String,
}

/// A speech-synthesis utterance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Utterance {
    /// Text to speak.
    pub text: String,
    /// Voice pitch (1.0 = default).
    pub pitch: f64,
    /// Speaking rate (1.0 = default).
    pub rate: f64,
    /// Volume (0.0 to 1.0).
    pub volume: f64,
}

/// Permission handling and notification display.
#[async_trait]
pub trait NotificationSurface: Send + Sync {
    /// Current notification permission.
    async fn permission_state(&self) -> Result<PermissionState, DeviceError>;

    /// Ask the user for permission.
    ///
    /// Only called when the current state is [`PermissionState::Default`].
    async fn request_permission(&self) -> Result<PermissionState, DeviceError>;

    /// Display the notification, replacing any prior one with the same tag.
    async fn show(&self, notification: Notification) -> Result<(), DeviceError>;
}

/// The siren audio clip.
///
/// One clip handle per host; each alert rewinds and restarts the same clip.
#[async_trait]
pub trait SirenClip: Send + Sync {
    /// Move the playback position.
    async fn seek(&self, position: Duration) -> Result<(), DeviceError>;

    /// Set playback volume (0.0 to 1.0).
    async fn set_volume(&self, volume: f64) -> Result<(), DeviceError>;

    /// Start playback from the current position.
    ///
    /// Hosts may refuse to start audio (for example before any user
    /// interaction); that surfaces as an error from this call.
    async fn play(&self) -> Result<(), DeviceError>;

    /// Pause playback.
    async fn pause(&self) -> Result<(), DeviceError>;
}

/// The speech-synthesis queue.
#[async_trait]
pub trait SpeechSynth: Send + Sync {
    /// Queue an utterance for speaking.
    async fn speak(&self, utterance: Utterance) -> Result<(), DeviceError>;

    /// Stop the current utterance and clear the queue.
    async fn cancel(&self) -> Result<(), DeviceError>;
}

/// The vibration motor.
#[async_trait]
pub trait Vibrator: Send + Sync {
    /// Vibrate with the given on/off pattern in milliseconds.
    ///
    /// Returns false when the host has no vibration support.
    async fn vibrate(&self, pattern: &[u64]) -> Result<bool, DeviceError>;
}

/// The four output-channel handles the pipeline fans out to.
#[derive(Clone)]
pub struct Devices {
    /// Notification permission and display.
    pub notifications: Arc<dyn NotificationSurface>,
    /// Siren audio clip.
    pub siren: Arc<dyn SirenClip>,
    /// Speech synthesis.
    pub speech: Arc<dyn SpeechSynth>,
    /// Vibration motor.
    pub vibrator: Arc<dyn Vibrator>,
}

impl Devices {
    /// Devices for a host with no outputs at all.
    ///
    /// Notifications report as denied, audio and speech are discarded, and
    /// vibration reports as unsupported.
    pub fn null() -> Self {
        Self {
            notifications: Arc::new(NullNotificationSurface),
            siren: Arc::new(NullSiren),
            speech: Arc::new(NullSpeech),
            vibrator: Arc::new(NullVibrator),
        }
    }
}

impl std::fmt::Debug for Devices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Devices").finish_non_exhaustive()
    }
}

/// A notification surface that reports notifications as blocked.
#[derive(Debug, Clone, Default)]
pub struct NullNotificationSurface;

#[async_trait]
impl NotificationSurface for NullNotificationSurface {
    async fn permission_state(&self) -> Result<PermissionState, DeviceError> {
        Ok(PermissionState::Denied)
    }

    async fn request_permission(&self) -> Result<PermissionState, DeviceError> {
        Ok(PermissionState::Denied)
    }

    async fn show(&self, _notification: Notification) -> Result<(), DeviceError> {
        Ok(())
    }
}

/// A siren clip that discards all playback.
#[derive(Debug, Clone, Default)]
pub struct NullSiren;

#[async_trait]
impl SirenClip for NullSiren {
    async fn seek(&self, _position: Duration) -> Result<(), DeviceError> {
        Ok(())
    }

    async fn set_volume(&self, _volume: f64) -> Result<(), DeviceError> {
        Ok(())
    }

    async fn play(&self) -> Result<(), DeviceError> {
        Ok(())
    }

    async fn pause(&self) -> Result<(), DeviceError> {
        Ok(())
    }
}

/// A speech synthesizer that discards all utterances.
#[derive(Debug, Clone, Default)]
pub struct NullSpeech;

#[async_trait]
impl SpeechSynth for NullSpeech {
    async fn speak(&self, _utterance: Utterance) -> Result<(), DeviceError> {
        Ok(())
    }

    async fn cancel(&self) -> Result<(), DeviceError> {
        Ok(())
    }
}

/// A vibrator that reports no vibration support.
#[derive(Debug, Clone, Default)]
pub struct NullVibrator;

#[async_trait]
impl Vibrator for NullVibrator {
    async fn vibrate(&self, _pattern: &[u64]) -> Result<bool, DeviceError> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_devices() {
        let devices = Devices::null();

        assert_eq!(
            devices.notifications.permission_state().await.unwrap(),
            PermissionState::Denied
        );
        assert!(!devices.vibrator.vibrate(&[100, 50, 100]).await.unwrap());
        devices.siren.play().await.unwrap();
        devices.speech.cancel().await.unwrap();
    }

    #[test]
    fn test_permission_state_wire_format() {
        assert_eq!(
            serde_json::to_string(&PermissionState::Granted).unwrap(),
            "\"granted\""
        );
        assert_eq!(
            serde_json::to_string(&PermissionState::Denied).unwrap(),
            "\"denied\""
        );
        assert_eq!(
            serde_json::to_string(&PermissionState::Default).unwrap(),
            "\"default\""
        );
        let state: PermissionState = serde_json::from_str("\"granted\"").unwrap();
        assert_eq!(state, PermissionState::Granted);
    }

    #[test]
    fn test_notification_serializes_without_empty_options() {
        let notification = Notification {
            title: "Water Level Alert".to_string(),
            body: "Water level has reached 3.2m!".to_string(),
            icon: None,
            badge: None,
            vibrate: vec![1000, 100],
            tag: "water-level-alert".to_string(),
            renotify: true,
            data: NotificationData {
                click_target: "/dashboard".to_string(),
            },
        };
        let json = serde_json::to_value(&notification).unwrap();
        assert!(json.get("icon").is_none());
        assert!(json.get("badge").is_none());
        assert_eq!(json["renotify"], serde_json::json!(true));
        assert_eq!(json["data"]["click_target"], "/dashboard");
    }
}
