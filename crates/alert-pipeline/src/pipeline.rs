//! Alert pipeline lifecycle and event loop.

use std::sync::Arc;

use feed_client::ChangeFilter;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::config::PipelineConfig;
use crate::devices::{Devices, NotificationSurface, PermissionState};
use crate::error::PipelineError;
use crate::fanout::fan_out;
use crate::feed::{AlertFeed, FeedSubscription};

/// Lifecycle state of a pipeline instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Constructed, not yet activated.
    Idle,
    /// Resolving permission and opening the subscription.
    Initializing,
    /// Subscribed and reacting to events.
    Active,
    /// Deactivated. Final for this instance.
    Terminated,
}

struct Worker {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// The real-time threshold-alert pipeline.
///
/// One instance per hosting view. [`activate`](AlertPipeline::activate)
/// opens the feed subscription and starts reacting to events;
/// [`deactivate`](AlertPipeline::deactivate) tears the subscription down.
/// A terminated instance stays terminated; the host creates a fresh one
/// to start alerting again.
pub struct AlertPipeline {
    feed: Arc<dyn AlertFeed>,
    devices: Devices,
    config: PipelineConfig,
    state: PipelineState,
    worker: Option<Worker>,
}

impl AlertPipeline {
    /// Create an idle pipeline.
    pub fn new(feed: Arc<dyn AlertFeed>, devices: Devices, config: PipelineConfig) -> Self {
        Self {
            feed,
            devices,
            config,
            state: PipelineState::Idle,
            worker: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Activate the pipeline: resolve notification permission, open the
    /// feed subscription, and start the event loop.
    ///
    /// Permission problems only disable the notification channel. A failed
    /// subscription is the one error surfaced to the caller; the pipeline
    /// returns to idle and can be activated again.
    pub async fn activate(&mut self) -> Result<(), PipelineError> {
        if self.state != PipelineState::Idle {
            return Err(PipelineError::InvalidState {
                expected: PipelineState::Idle,
                actual: self.state,
            });
        }
        self.state = PipelineState::Initializing;
        info!("Activating alert pipeline on channel {}", self.config.channel);

        let permission = resolve_permission(self.devices.notifications.as_ref()).await;
        if permission != PermissionState::Granted {
            info!("Notification channel disabled (permission {:?})", permission);
        }

        let filter = ChangeFilter::inserts(self.config.table.as_str());
        let subscription = match self.feed.subscribe(&self.config.channel, filter).await {
            Ok(subscription) => subscription,
            Err(e) => {
                error!("Failed to open alert subscription: {}", e);
                self.state = PipelineState::Idle;
                return Err(PipelineError::Subscribe(e));
            }
        };
        info!("Alert subscription {} established", subscription.id());

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run_loop(
            subscription,
            self.devices.clone(),
            self.config.clone(),
            permission,
            shutdown_rx,
        ));

        self.worker = Some(Worker {
            shutdown: shutdown_tx,
            handle,
        });
        self.state = PipelineState::Active;
        Ok(())
    }

    /// Deactivate the pipeline and release the subscription.
    ///
    /// After this returns no further events are handled. Fan-outs already
    /// in flight, including a pending spoken warning, complete naturally.
    pub async fn deactivate(&mut self) {
        match self.state {
            PipelineState::Terminated => return,
            PipelineState::Idle | PipelineState::Initializing => {
                self.state = PipelineState::Terminated;
                return;
            }
            PipelineState::Active => {}
        }

        info!("Deactivating alert pipeline");
        if let Some(worker) = self.worker.take() {
            // The worker may already have exited if the stream ended
            let _ = worker.shutdown.send(true);
            if let Err(e) = worker.handle.await {
                warn!("Alert worker task failed: {}", e);
            }
        }
        self.state = PipelineState::Terminated;
    }
}

/// Resolve the effective notification permission for this activation.
///
/// Asks the user only when no decision has been made yet. Any surface
/// failure degrades to denied rather than failing activation.
async fn resolve_permission(surface: &dyn NotificationSurface) -> PermissionState {
    match surface.permission_state().await {
        Ok(PermissionState::Default) => match surface.request_permission().await {
            Ok(state) => state,
            Err(e) => {
                warn!("Notification permission request failed: {}", e);
                PermissionState::Denied
            }
        },
        Ok(state) => state,
        Err(e) => {
            warn!("Notification permission unavailable: {}", e);
            PermissionState::Denied
        }
    }
}

async fn run_loop(
    mut subscription: Box<dyn FeedSubscription>,
    devices: Devices,
    config: PipelineConfig,
    permission: PermissionState,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            biased;

            // Check for shutdown first so no event is picked up after
            // teardown was requested
            _ = shutdown.changed() => {
                info!("Shutdown requested, stopping alert loop");
                break;
            }

            event = subscription.next_event() => {
                match event {
                    Some(Ok(event)) => {
                        fan_out(&devices, &config, permission, &event);
                    }
                    Some(Err(e)) => {
                        error!("Alert feed error: {}", e);
                    }
                    None => {
                        warn!("Alert feed stream ended");
                        break;
                    }
                }
            }
        }
    }

    if let Err(e) = subscription.unsubscribe().await {
        warn!("Failed to release alert subscription: {}", e);
    }
}
