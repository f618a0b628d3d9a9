//! Server-Sent Events (SSE) stream of database change events.

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::stream::{Stream, StreamExt};
use reqwest_eventsource::{Event, EventSource};
use tracing::{debug, error, info, warn};

use crate::config::FeedConfig;
use crate::error::FeedError;
use crate::types::{AlertEvent, ChangeFilter, ChangeFrame, SubscribedFrame, SubscriptionId};

/// How long to wait for the server to acknowledge a subscription.
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for automatic reconnection.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Maximum number of retries (None = infinite).
    pub max_retries: Option<u32>,
    /// Initial delay before first retry.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Backoff multiplier for each retry.
    pub backoff_multiplier: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_retries: None,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl ReconnectConfig {
    /// Calculate delay for a given attempt number.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay_ms = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi(attempt as i32);
        let delay = Duration::from_millis(delay_ms as u64);
        delay.min(self.max_delay)
    }

    /// Check if we should retry after the given number of attempts.
    pub fn should_retry(&self, attempts: u32) -> bool {
        self.max_retries.map_or(true, |max| attempts < max)
    }
}

fn frame_matches(frame: &ChangeFrame, filter: &ChangeFilter) -> bool {
    frame.event_type == filter.event.as_str() && frame.table == filter.table
}

/// A stream of alert events matching one change filter.
///
/// Frames for other tables or event kinds are dropped, and frames that
/// fail to parse are logged and skipped so one bad row cannot stall the
/// subscription.
pub struct EventStream {
    event_source: EventSource,
    filter: ChangeFilter,
    subscription_id: Option<SubscriptionId>,
}

impl EventStream {
    pub(crate) fn new(event_source: EventSource, filter: ChangeFilter) -> Self {
        Self {
            event_source,
            filter,
            subscription_id: None,
        }
    }

    /// Server-assigned subscription ID, once the acknowledgement frame arrived.
    pub fn subscription_id(&self) -> Option<SubscriptionId> {
        self.subscription_id
    }
}

impl Stream for EventStream {
    type Item = Result<AlertEvent, FeedError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.event_source).poll_next(cx) {
                Poll::Ready(Some(Ok(event))) => {
                    match event {
                        Event::Open => {
                            debug!("SSE connection opened");
                            continue;
                        }
                        Event::Message(msg) => match msg.event.as_str() {
                            "subscribed" => {
                                match serde_json::from_str::<SubscribedFrame>(&msg.data) {
                                    Ok(frame) => {
                                        debug!(
                                            "Subscription {} acknowledged",
                                            frame.subscription_id
                                        );
                                        self.subscription_id = Some(frame.subscription_id);
                                    }
                                    Err(e) => {
                                        warn!("Failed to parse subscription ack: {}", e);
                                        debug!("Raw data: {}", msg.data);
                                    }
                                }
                                continue;
                            }
                            "change" => {
                                let frame =
                                    match serde_json::from_str::<ChangeFrame>(&msg.data) {
                                        Ok(frame) => frame,
                                        Err(e) => {
                                            warn!("Failed to parse change frame: {}", e);
                                            debug!("Raw data: {}", msg.data);
                                            continue;
                                        }
                                    };
                                if !frame_matches(&frame, &self.filter) {
                                    debug!(
                                        "Ignoring change for {} ({})",
                                        frame.table, frame.event_type
                                    );
                                    continue;
                                }
                                match serde_json::from_value::<AlertEvent>(frame.record) {
                                    Ok(event) => return Poll::Ready(Some(Ok(event))),
                                    Err(e) => {
                                        warn!("Failed to parse alert record: {}", e);
                                        continue;
                                    }
                                }
                            }
                            other => {
                                debug!("Ignoring SSE event type: {}", other);
                                continue;
                            }
                        },
                    }
                }
                Poll::Ready(Some(Err(e))) => {
                    error!("SSE error: {}", e);
                    return Poll::Ready(Some(Err(FeedError::Sse(e.to_string()))));
                }
                Poll::Ready(None) => {
                    info!("SSE stream ended");
                    return Poll::Ready(None);
                }
                Poll::Pending => {
                    return Poll::Pending;
                }
            }
        }
    }
}

/// An acknowledged subscription to a channel.
///
/// Dropping the subscription closes the SSE connection; call
/// [`unsubscribe`](Subscription::unsubscribe) to also tell the server to
/// release it.
pub struct Subscription {
    id: SubscriptionId,
    stream: EventStream,
    pending: VecDeque<AlertEvent>,
    http: reqwest::Client,
    leave_url: String,
}

impl Subscription {
    /// Wait for the server's acknowledgement frame, then wrap the stream.
    ///
    /// Change frames that arrive before the acknowledgement are buffered and
    /// delivered by [`next_event`](Subscription::next_event) in order.
    pub(crate) async fn establish(
        mut stream: EventStream,
        http: reqwest::Client,
        config: &FeedConfig,
    ) -> Result<Self, FeedError> {
        let deadline = tokio::time::Instant::now() + HANDSHAKE_TIMEOUT;
        let mut pending = VecDeque::new();

        let id = loop {
            if let Some(id) = stream.subscription_id() {
                break id;
            }
            match tokio::time::timeout_at(deadline, stream.next()).await {
                Ok(Some(Ok(event))) => pending.push_back(event),
                Ok(Some(Err(e))) => return Err(e),
                Ok(None) => return Err(FeedError::Closed),
                Err(_) => return Err(FeedError::HandshakeTimeout(HANDSHAKE_TIMEOUT)),
            }
        };

        info!("Subscribed with ID {}", id);
        Ok(Self {
            id,
            stream,
            pending,
            http,
            leave_url: config.leave_url(id),
        })
    }

    /// Server-assigned subscription ID.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Wait for the next matching alert event.
    ///
    /// Returns None once the stream has ended.
    pub async fn next_event(&mut self) -> Option<Result<AlertEvent, FeedError>> {
        if let Some(event) = self.pending.pop_front() {
            return Some(Ok(event));
        }
        self.stream.next().await
    }

    /// Tell the server to release the subscription and close the stream.
    pub async fn unsubscribe(self) -> Result<(), FeedError> {
        debug!("Leaving subscription {}", self.id);
        let response = self.http.post(&self.leave_url).send().await?;
        response.error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChangeEventKind;

    #[test]
    fn test_reconnect_delay_backoff() {
        let config = ReconnectConfig::default();
        assert_eq!(config.delay_for_attempt(0), Duration::from_millis(500));
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(1000));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(2000));
    }

    #[test]
    fn test_reconnect_delay_caps_at_max() {
        let config = ReconnectConfig {
            max_retries: None,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 10.0,
        };
        assert_eq!(config.delay_for_attempt(3), Duration::from_secs(5));
    }

    #[test]
    fn test_should_retry_respects_limit() {
        let unlimited = ReconnectConfig::default();
        assert!(unlimited.should_retry(1000));

        let limited = ReconnectConfig {
            max_retries: Some(3),
            ..ReconnectConfig::default()
        };
        assert!(limited.should_retry(2));
        assert!(!limited.should_retry(3));
    }

    #[test]
    fn test_frame_matching() {
        let filter = ChangeFilter::inserts("water_alerts");

        let matching = ChangeFrame {
            table: "water_alerts".to_string(),
            event_type: "INSERT".to_string(),
            record: serde_json::json!({"water_level": 3.2}),
        };
        assert!(frame_matches(&matching, &filter));

        let wrong_table = ChangeFrame {
            table: "river_gauges".to_string(),
            ..matching.clone()
        };
        assert!(!frame_matches(&wrong_table, &filter));

        let wrong_kind = ChangeFrame {
            event_type: "UPDATE".to_string(),
            ..matching
        };
        assert!(!frame_matches(&wrong_kind, &filter));

        let update_filter = ChangeFilter {
            event: ChangeEventKind::Update,
            table: "water_alerts".to_string(),
        };
        assert!(frame_matches(&wrong_kind, &update_filter));
    }
}
