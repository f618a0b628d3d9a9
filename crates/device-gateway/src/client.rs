//! Device gateway HTTP client.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alert_pipeline::{Notification, PermissionState, Utterance};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::types::{
    ClipHandle, ClipParams, DismissParams, FocusWindowParams, LoadClipParams, OpenWindowParams,
    PermissionResult, RegisterHandlerParams, SeekParams, VibrateParams, VibrateResult,
    VolumeParams, WindowHandle,
};

/// JSON-RPC 2.0 request structure.
#[derive(Debug, Serialize)]
struct RpcRequest<'a, T: Serialize> {
    jsonrpc: &'static str,
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<T>,
    id: u64,
}

/// JSON-RPC 2.0 response structure.
#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    #[allow(dead_code)]
    jsonrpc: String,
    result: Option<T>,
    error: Option<RpcError>,
    #[allow(dead_code)]
    id: u64,
}

/// JSON-RPC 2.0 error.
#[derive(Debug, Deserialize)]
struct RpcError {
    code: i32,
    message: String,
}

/// Client for the device gateway daemon.
///
/// The gateway owns the host's notification surface, audio sinks, speech
/// synthesis, and vibration motor; this client drives them over JSON-RPC.
#[derive(Clone)]
pub struct GatewayClient {
    http: Client,
    config: GatewayConfig,
    request_id: Arc<AtomicU64>,
    connected: Arc<AtomicBool>,
}

impl GatewayClient {
    /// Connect to the device gateway.
    pub async fn connect(config: GatewayConfig) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(GatewayError::Http)?;

        let client = Self {
            http,
            config,
            request_id: Arc::new(AtomicU64::new(1)),
            connected: Arc::new(AtomicBool::new(false)),
        };

        // Verify connection with health check
        if client.health_check().await? {
            client.connected.store(true, Ordering::SeqCst);
            info!("Connected to device gateway at {}", client.config.base_url);
        } else {
            return Err(GatewayError::HealthCheckFailed);
        }

        Ok(client)
    }

    /// Check if currently connected to the gateway.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Perform a health check against the gateway.
    pub async fn health_check(&self) -> Result<bool, GatewayError> {
        let url = self.config.check_url();
        debug!("Health check: {}", url);

        match self.http.get(&url).send().await {
            Ok(resp) => {
                let ok = resp.status().is_success();
                self.connected.store(ok, Ordering::SeqCst);
                Ok(ok)
            }
            Err(e) => {
                self.connected.store(false, Ordering::SeqCst);
                Err(GatewayError::Http(e))
            }
        }
    }

    /// Get the current notification permission.
    pub async fn permission_state(&self) -> Result<PermissionState, GatewayError> {
        let resp: PermissionResult = self.rpc_call::<(), _>("getPermissionState", None).await?;
        Ok(resp.state)
    }

    /// Ask the user for notification permission.
    pub async fn request_permission(&self) -> Result<PermissionState, GatewayError> {
        let resp: PermissionResult = self.rpc_call::<(), _>("requestPermission", None).await?;
        Ok(resp.state)
    }

    /// Display a notification, replacing any prior one with the same tag.
    pub async fn show_notification(
        &self,
        notification: &Notification,
    ) -> Result<(), GatewayError> {
        // showNotification returns an empty result on success
        let _: serde_json::Value = self.rpc_call("showNotification", Some(notification)).await?;
        Ok(())
    }

    /// Dismiss the notification with the given tag.
    pub async fn dismiss_notification(&self, tag: &str) -> Result<(), GatewayError> {
        let params = DismissParams {
            tag: tag.to_string(),
        };
        let _: serde_json::Value = self.rpc_call("dismissNotification", Some(params)).await?;
        Ok(())
    }

    /// Register the URL the gateway calls back on notification clicks.
    ///
    /// Idempotent when the same location is already registered.
    pub async fn register_click_handler(&self, location: &str) -> Result<(), GatewayError> {
        let params = RegisterHandlerParams {
            location: location.to_string(),
        };
        let _: serde_json::Value = self
            .rpc_call("registerBackgroundHandler", Some(params))
            .await?;
        Ok(())
    }

    /// Open a new application window at `url`.
    pub async fn open_window(&self, url: &str) -> Result<WindowHandle, GatewayError> {
        let params = OpenWindowParams {
            url: url.to_string(),
        };
        self.rpc_call("openWindow", Some(params)).await
    }

    /// Bring an open window to the foreground.
    pub async fn focus_window(&self, window_id: &str) -> Result<(), GatewayError> {
        let params = FocusWindowParams {
            window_id: window_id.to_string(),
        };
        let _: serde_json::Value = self.rpc_call("focusWindow", Some(params)).await?;
        Ok(())
    }

    /// Load an audio clip and return its handle.
    pub async fn load_audio_clip(&self, url: &str) -> Result<ClipHandle, GatewayError> {
        let params = LoadClipParams {
            url: url.to_string(),
        };
        self.rpc_call("loadAudioClip", Some(params)).await
    }

    /// Start playback of a loaded clip from its current position.
    pub async fn play(&self, clip_id: &str) -> Result<(), GatewayError> {
        let params = ClipParams {
            clip_id: clip_id.to_string(),
        };
        let _: serde_json::Value = self.rpc_call("play", Some(params)).await?;
        Ok(())
    }

    /// Pause playback of a loaded clip.
    pub async fn pause(&self, clip_id: &str) -> Result<(), GatewayError> {
        let params = ClipParams {
            clip_id: clip_id.to_string(),
        };
        let _: serde_json::Value = self.rpc_call("pause", Some(params)).await?;
        Ok(())
    }

    /// Move the playback position of a loaded clip.
    pub async fn seek(&self, clip_id: &str, position: Duration) -> Result<(), GatewayError> {
        let params = SeekParams {
            clip_id: clip_id.to_string(),
            position_ms: position.as_millis() as u64,
        };
        let _: serde_json::Value = self.rpc_call("seek", Some(params)).await?;
        Ok(())
    }

    /// Set the volume of a loaded clip.
    pub async fn set_volume(&self, clip_id: &str, volume: f64) -> Result<(), GatewayError> {
        let params = VolumeParams {
            clip_id: clip_id.to_string(),
            volume,
        };
        let _: serde_json::Value = self.rpc_call("setVolume", Some(params)).await?;
        Ok(())
    }

    /// Queue an utterance on the host speech synthesizer.
    pub async fn speak(&self, utterance: &Utterance) -> Result<(), GatewayError> {
        let _: serde_json::Value = self.rpc_call("speak", Some(utterance)).await?;
        Ok(())
    }

    /// Stop the current utterance and clear the speech queue.
    pub async fn cancel_speech(&self) -> Result<(), GatewayError> {
        let _: serde_json::Value = self.rpc_call::<(), _>("cancelSpeech", None).await?;
        Ok(())
    }

    /// Run a vibration pattern. Returns false when unsupported.
    pub async fn vibrate(&self, pattern: &[u64]) -> Result<bool, GatewayError> {
        let params = VibrateParams {
            pattern: pattern.to_vec(),
        };
        let resp: VibrateResult = self.rpc_call("vibrate", Some(params)).await?;
        Ok(resp.supported)
    }

    /// Get the configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Make a JSON-RPC call to the gateway.
    async fn rpc_call<P: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: Option<P>,
    ) -> Result<R, GatewayError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        let url = self.config.rpc_url();

        let request = RpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id,
        };

        debug!("RPC call: {} (id={})", method, id);

        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(GatewayError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Connection(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let rpc_response: RpcResponse<R> = response.json().await.map_err(GatewayError::Http)?;

        if let Some(error) = rpc_response.error {
            return Err(GatewayError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        rpc_response.result.ok_or_else(|| GatewayError::Rpc {
            code: -1,
            message: "No result in response".to_string(),
        })
    }
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("config", &self.config)
            .field("connected", &self.is_connected())
            .finish()
    }
}
