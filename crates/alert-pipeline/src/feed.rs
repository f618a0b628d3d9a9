//! Change-feed seam between the pipeline and the realtime service.

use async_trait::async_trait;
use feed_client::{AlertEvent, ChangeFilter, FeedClient, FeedError, Subscription, SubscriptionId};

/// A source of alert-event subscriptions.
///
/// Implemented for [`FeedClient`]; tests substitute a scripted feed.
#[async_trait]
pub trait AlertFeed: Send + Sync {
    /// Open a subscription for changes matching `filter` on `channel`.
    async fn subscribe(
        &self,
        channel: &str,
        filter: ChangeFilter,
    ) -> Result<Box<dyn FeedSubscription>, FeedError>;
}

/// One open alert-event subscription.
#[async_trait]
pub trait FeedSubscription: Send {
    /// Server-assigned subscription ID.
    fn id(&self) -> SubscriptionId;

    /// Wait for the next event. None means the stream has ended.
    async fn next_event(&mut self) -> Option<Result<AlertEvent, FeedError>>;

    /// Release the subscription. No events are delivered after this returns.
    async fn unsubscribe(&mut self) -> Result<(), FeedError>;
}

#[async_trait]
impl AlertFeed for FeedClient {
    async fn subscribe(
        &self,
        channel: &str,
        filter: ChangeFilter,
    ) -> Result<Box<dyn FeedSubscription>, FeedError> {
        let subscription = FeedClient::subscribe(self, channel, filter).await?;
        Ok(Box::new(LiveSubscription {
            id: subscription.id(),
            inner: Some(subscription),
        }))
    }
}

/// Adapter giving [`Subscription`] the object-safe subscription shape.
struct LiveSubscription {
    id: SubscriptionId,
    // Taken on unsubscribe so a second call is a no-op
    inner: Option<Subscription>,
}

#[async_trait]
impl FeedSubscription for LiveSubscription {
    fn id(&self) -> SubscriptionId {
        self.id
    }

    async fn next_event(&mut self) -> Option<Result<AlertEvent, FeedError>> {
        match self.inner.as_mut() {
            Some(subscription) => subscription.next_event().await,
            None => None,
        }
    }

    async fn unsubscribe(&mut self) -> Result<(), FeedError> {
        match self.inner.take() {
            Some(subscription) => subscription.unsubscribe().await,
            None => Ok(()),
        }
    }
}
