use std::sync::Arc;

use tracing::debug;

use super::broker::{BrokerError, MessageBroker};
use super::envelope::Envelope;

/// Outbound notification hook used by the interview lifecycle.
///
/// `publish` returns once the broker has accepted the envelope; callers treat an
/// error as fatal to the request that produced it.
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, envelope: &Envelope) -> Result<(), PublishError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("failed to encode notification envelope: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to enqueue notification: {0}")]
    Broker(#[from] BrokerError),
}

/// Publishes JSON envelopes onto a single named topic.
pub struct TopicPublisher<B: ?Sized> {
    broker: Arc<B>,
    topic: String,
}

impl<B> TopicPublisher<B>
where
    B: MessageBroker + ?Sized,
{
    pub fn new(broker: Arc<B>, topic: impl Into<String>) -> Self {
        Self {
            broker,
            topic: topic.into(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

impl<B> NotificationPublisher for TopicPublisher<B>
where
    B: MessageBroker + ?Sized,
{
    fn publish(&self, envelope: &Envelope) -> Result<(), PublishError> {
        let payload = envelope.to_bytes()?;
        let message_id = self.broker.publish(&self.topic, payload)?;
        debug!(%message_id, topic = %self.topic, "notification enqueued");
        Ok(())
    }
}
