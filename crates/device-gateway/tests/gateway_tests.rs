//! Integration tests for the device gateway client.
//!
//! Most tests here exercise configuration and serialization without a
//! live gateway. Tests marked `#[ignore]` need a gateway daemon running
//! on localhost:8090.

use alert_pipeline::{DeviceError, PermissionState};
use device_gateway::{GatewayClient, GatewayConfig, GatewayError, CODE_PLAYBACK_REJECTED};

fn test_config() -> GatewayConfig {
    GatewayConfig::default()
}

mod config_tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = test_config();
        assert_eq!(config.base_url, "http://localhost:8090");
        assert_eq!(config.rpc_url(), "http://localhost:8090/api/v1/rpc");
        assert_eq!(config.check_url(), "http://localhost:8090/api/v1/check");
    }

    #[test]
    fn test_custom_base_url() {
        let config = GatewayConfig::new("http://gateway.local:9000");
        assert_eq!(config.rpc_url(), "http://gateway.local:9000/api/v1/rpc");
    }
}

mod error_tests {
    use super::*;

    #[test]
    fn test_playback_rejection_maps_to_device_error() {
        let err = GatewayError::Rpc {
            code: CODE_PLAYBACK_REJECTED,
            message: "no user gesture yet".to_string(),
        };
        match DeviceError::from(err) {
            DeviceError::PlaybackRejected(reason) => {
                assert_eq!(reason, "no user gesture yet");
            }
            other => panic!("expected PlaybackRejected, got {:?}", other),
        }
    }

    #[test]
    fn test_generic_rpc_error_maps_to_failed() {
        let err = GatewayError::Rpc {
            code: -32601,
            message: "Method not found".to_string(),
        };
        assert!(matches!(DeviceError::from(err), DeviceError::Failed(_)));
    }
}

mod connection_tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_failure() {
        // Port 59998 should not have anything listening
        let config = GatewayConfig::new("http://127.0.0.1:59998");
        let result = GatewayClient::connect(config).await;
        assert!(result.is_err());
        match result {
            Err(GatewayError::Http(_)) => {}
            Err(e) => panic!("Expected Http error, got: {:?}", e),
            Ok(_) => panic!("Expected connection to fail"),
        }
    }

    #[tokio::test]
    #[ignore = "requires running gateway"]
    async fn test_connect_success() {
        let client = GatewayClient::connect(test_config()).await.unwrap();
        assert!(client.is_connected());
    }

    #[tokio::test]
    #[ignore = "requires running gateway"]
    async fn test_permission_state() {
        let client = GatewayClient::connect(test_config()).await.unwrap();
        let state = client.permission_state().await.unwrap();
        assert!(matches!(
            state,
            PermissionState::Granted | PermissionState::Denied | PermissionState::Default
        ));
    }

    #[tokio::test]
    #[ignore = "requires running gateway"]
    async fn test_load_and_control_clip() {
        let client = GatewayClient::connect(test_config()).await.unwrap();
        let clip = client
            .load_audio_clip("/sounds/warning_siren.mp3")
            .await
            .unwrap();
        assert!(!clip.clip_id.is_empty());

        client
            .seek(&clip.clip_id, std::time::Duration::ZERO)
            .await
            .unwrap();
        client.set_volume(&clip.clip_id, 1.0).await.unwrap();
        client.pause(&clip.clip_id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires running gateway"]
    async fn test_vibrate() {
        let client = GatewayClient::connect(test_config()).await.unwrap();
        let supported = client.vibrate(&[100, 50, 100]).await.unwrap();
        println!("vibration supported: {}", supported);
    }
}
