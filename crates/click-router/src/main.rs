//! Click router daemon entry point.

use std::sync::Arc;

use device_gateway::{GatewayClient, GatewayConfig};
use tokio::sync::watch;
use tracing::info;

use click_router::config::RouterConfig;
use click_router::state::AppState;
use click_router::surface::GatewaySurface;
use click_router::{routes, session, store::RouterStore, version};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = RouterConfig::from_env()?;
    info!(addr = %config.addr, version = version(), "Starting click router");

    // Connect to the session store
    let store = RouterStore::connect(&config.database_url).await?;
    store.migrate().await?;

    // Take control of every persisted session immediately
    let claimed = session::claim_sessions(store.pool(), version()).await?;
    info!(claimed, "Claimed registered sessions");

    // Connect to the device gateway and register the click callback
    let gateway = GatewayClient::connect(GatewayConfig::new(&config.gateway_url)).await?;
    let callback = format!("{}/v1/clicks", config.public_url());
    gateway.register_click_handler(&callback).await?;
    info!(callback = %callback, "Registered click callback with gateway");

    // Build application state
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let state = AppState::new(
        store,
        Arc::new(GatewaySurface::new(gateway)),
        config.default_target.clone(),
        shutdown_tx,
    );

    // Build router
    let app = routes::router().with_state(state);

    // Start server
    info!(addr = %config.addr, "Click router listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = shutdown_rx.changed() => {},
                _ = tokio::signal::ctrl_c() => {},
            }
        })
        .await?;

    info!("Click router stopped");
    Ok(())
}
