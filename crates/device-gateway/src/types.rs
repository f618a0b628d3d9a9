//! Request and response types for the device gateway protocol.

use alert_pipeline::PermissionState;
use serde::{Deserialize, Serialize};

/// RPC error code returned when the host refuses to start playback.
pub const CODE_PLAYBACK_REJECTED: i32 = -32001;

/// Result of `getPermissionState` and `requestPermission`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionResult {
    /// Notification permission after the call.
    pub state: PermissionState,
}

/// Parameters for `loadAudioClip`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadClipParams {
    /// URL or path of the audio file.
    pub url: String,
}

/// A loaded audio clip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipHandle {
    /// Gateway-assigned clip identifier.
    pub clip_id: String,
}

/// Parameters addressing one loaded clip (`play`, `pause`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipParams {
    pub clip_id: String,
}

/// Parameters for `seek`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeekParams {
    pub clip_id: String,
    /// Playback position in milliseconds.
    pub position_ms: u64,
}

/// Parameters for `setVolume`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeParams {
    pub clip_id: String,
    /// Volume from 0.0 to 1.0.
    pub volume: f64,
}

/// Parameters for `vibrate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VibrateParams {
    /// Alternating on/off durations in milliseconds.
    pub pattern: Vec<u64>,
}

/// Result of `vibrate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VibrateResult {
    /// Whether the host has a vibration motor.
    pub supported: bool,
}

/// Parameters for `dismissNotification`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DismissParams {
    /// Tag of the notification to dismiss.
    pub tag: String,
}

/// Parameters for `openWindow`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenWindowParams {
    /// Destination the new window navigates to.
    pub url: String,
}

/// An application window known to the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowHandle {
    /// Gateway-assigned window identifier.
    pub window_id: String,
}

/// Parameters for `focusWindow`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusWindowParams {
    pub window_id: String,
}

/// Parameters for `registerBackgroundHandler`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterHandlerParams {
    /// URL the gateway delivers notification click callbacks to.
    pub location: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_params_use_camel_case() {
        let params = SeekParams {
            clip_id: "clip-1".to_string(),
            position_ms: 0,
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["clipId"], "clip-1");
        assert_eq!(json["positionMs"], 0);
    }

    #[test]
    fn test_permission_result_round_trip() {
        let result: PermissionResult =
            serde_json::from_str(r#"{"state": "granted"}"#).unwrap();
        assert_eq!(result.state, PermissionState::Granted);
    }

    #[test]
    fn test_window_handle_wire_format() {
        let handle: WindowHandle =
            serde_json::from_str(r#"{"windowId": "win-7"}"#).unwrap();
        assert_eq!(handle.window_id, "win-7");
    }
}
