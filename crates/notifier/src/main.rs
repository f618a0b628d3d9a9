//! Floodwatch resident alert notifier.
//!
//! Headless host for the alert pipeline: wires the change feed and the
//! device gateway together, installs the click router, activates the
//! pipeline, and keeps it running until ctrl-c.

mod config;

use std::sync::Arc;

use alert_pipeline::{AlertPipeline, Devices, NullSiren, PipelineConfig, SirenClip};
use click_router::{ensure_installed, InstallConfig};
use device_gateway::{
    GatewayClient, GatewayConfig, GatewayNotifications, GatewaySiren, GatewaySpeech,
    GatewayVibrator,
};
use feed_client::{FeedClient, FeedConfig, ReconnectConfig};
use tracing::{info, warn};

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env();
    info!(
        feed = %config.feed_url,
        gateway = %config.gateway_url,
        "Starting floodwatch notifier"
    );

    // Host devices, through the gateway when it is reachable
    let devices = match GatewayClient::connect(GatewayConfig::new(&config.gateway_url)).await {
        Ok(gateway) => {
            install_click_router(&config).await;
            gateway_devices(gateway, &config).await
        }
        Err(err) => {
            warn!("Device gateway unavailable, running with no outputs: {}", err);
            Devices::null()
        }
    };

    // Change feed
    let feed_config = match &config.feed_key {
        Some(key) => FeedConfig::with_api_key(&config.feed_url, key),
        None => FeedConfig::new(&config.feed_url),
    };
    let reconnect = ReconnectConfig {
        max_retries: Some(5),
        ..Default::default()
    };
    let feed = FeedClient::connect_with_retry(feed_config, reconnect).await?;

    // Alert pipeline
    let pipeline_config = PipelineConfig {
        channel: config.channel.clone(),
        table: config.table.clone(),
        click_target: config.click_target.clone(),
        ..Default::default()
    };
    let mut pipeline = AlertPipeline::new(Arc::new(feed), devices, pipeline_config);
    pipeline.activate().await?;
    info!("Alert pipeline active, press ctrl-c to stop");

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    pipeline.deactivate().await;

    Ok(())
}

/// Make sure the click routing daemon is answering.
///
/// Routing failures degrade clicks only; alerts still fire, so installation
/// problems are logged rather than aborting startup.
async fn install_click_router(config: &Config) {
    let install = InstallConfig::new(&config.router_bin, &config.router_addr)
        .with_database_url(&config.router_db)
        .with_gateway_url(&config.gateway_url)
        .with_default_target(&config.click_target);

    match ensure_installed(&install).await {
        Ok(installed) => info!("Click router installed: {:?}", installed),
        Err(err) => warn!(
            "Click router unavailable, notification clicks will not route: {}",
            err
        ),
    }
}

/// Build the device set over a connected gateway.
async fn gateway_devices(gateway: GatewayClient, config: &Config) -> Devices {
    let siren: Arc<dyn SirenClip> =
        match GatewaySiren::load(gateway.clone(), &config.siren_url).await {
            Ok(siren) => Arc::new(siren),
            Err(err) => {
                warn!("Failed to load siren clip, siren channel disabled: {}", err);
                Arc::new(NullSiren)
            }
        };

    Devices {
        notifications: Arc::new(GatewayNotifications::new(gateway.clone())),
        siren,
        speech: Arc::new(GatewaySpeech::new(gateway.clone())),
        vibrator: Arc::new(GatewayVibrator::new(gateway)),
    }
}
