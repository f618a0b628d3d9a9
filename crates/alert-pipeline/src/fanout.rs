//! Per-event fan-out to the four output channels.

use std::time::Duration;

use feed_client::AlertEvent;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::devices::{Devices, Notification, NotificationData, PermissionState, Utterance};

/// Vibration pattern: five 1000ms pulses separated by 100ms pauses.
pub const VIBRATION_PATTERN: [u64; 9] = [1000, 100, 1000, 100, 1000, 100, 1000, 100, 1000];

/// Title of the system notification.
pub const NOTIFICATION_TITLE: &str = "Water Level Alert";

/// Replacement tag so repeated alerts replace one another in the tray.
pub const NOTIFICATION_TAG: &str = "water-level-alert";

/// Gap between siren start and the start of the spoken warning.
pub const SPEECH_DELAY: Duration = Duration::from_millis(2000);

/// Run the fan-out procedure for one alert event.
///
/// Returns immediately; every channel runs as its own task. A failing
/// channel is logged and never affects the other three.
pub(crate) fn fan_out(
    devices: &Devices,
    config: &PipelineConfig,
    permission: PermissionState,
    event: &AlertEvent,
) {
    let level = event.water_level;
    info!("Water alert received: level {}m", level);

    // Channel 1: vibration
    let vibrator = devices.vibrator.clone();
    tokio::spawn(async move {
        match vibrator.vibrate(&VIBRATION_PATTERN).await {
            Ok(true) => {}
            Ok(false) => debug!("Vibration not supported on this host"),
            Err(e) => debug!("Vibration failed: {}", e),
        }
    });

    // Channel 2: system notification, skipped without permission
    if permission == PermissionState::Granted {
        let surface = devices.notifications.clone();
        let notification = Notification {
            title: NOTIFICATION_TITLE.to_string(),
            body: format!("Water level has reached {}m!", level),
            icon: config.icon.clone(),
            badge: config.badge.clone(),
            vibrate: VIBRATION_PATTERN.to_vec(),
            tag: NOTIFICATION_TAG.to_string(),
            renotify: true,
            data: NotificationData {
                click_target: config.click_target.clone(),
            },
        };
        tokio::spawn(async move {
            if let Err(e) = surface.show(notification).await {
                warn!("Failed to show notification: {}", e);
            }
        });
    }

    // Channels 3 and 4: restart the siren now, speak once it has played alone
    // for SPEECH_DELAY. Cancelling right before speaking means the newest
    // event's warning always silences an older one still in flight.
    let siren = devices.siren.clone();
    let speech = devices.speech.clone();
    tokio::spawn(async move {
        if let Err(e) = siren.seek(Duration::ZERO).await {
            warn!("Failed to rewind siren: {}", e);
        }
        if let Err(e) = siren.set_volume(1.0).await {
            warn!("Failed to set siren volume: {}", e);
        }
        if let Err(e) = siren.play().await {
            // Hosts can refuse playback before any user interaction
            debug!("Siren playback rejected: {}", e);
        }

        tokio::time::sleep(SPEECH_DELAY).await;

        if let Err(e) = speech.cancel().await {
            debug!("Speech unavailable, skipping spoken warning: {}", e);
            return;
        }
        let utterance = Utterance {
            text: format!("WARNING! WARNING! Water level has reached {} meters!", level),
            pitch: 1.0,
            rate: 0.9,
            volume: 1.0,
        };
        if let Err(e) = speech.speak(utterance).await {
            debug!("Spoken warning failed: {}", e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vibration_pattern_shape() {
        assert_eq!(VIBRATION_PATTERN.len(), 9);
        assert_eq!(VIBRATION_PATTERN.iter().filter(|&&ms| ms == 1000).count(), 5);
        assert_eq!(VIBRATION_PATTERN.iter().filter(|&&ms| ms == 100).count(), 4);
        assert_eq!(VIBRATION_PATTERN[0], 1000);
        assert_eq!(VIBRATION_PATTERN[8], 1000);
    }

    #[test]
    fn test_message_interpolation_matches_display() {
        // Whole levels read without a trailing ".0"
        assert_eq!(
            format!("Water level has reached {}m!", 3.2),
            "Water level has reached 3.2m!"
        );
        assert_eq!(
            format!("Water level has reached {}m!", 5.0),
            "Water level has reached 5m!"
        );
        assert_eq!(
            format!("WARNING! WARNING! Water level has reached {} meters!", 3.2),
            "WARNING! WARNING! Water level has reached 3.2 meters!"
        );
    }
}
