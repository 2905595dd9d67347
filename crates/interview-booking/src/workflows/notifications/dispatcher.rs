use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::broker::{Delivery, Subscription};
use super::envelope::Envelope;
use super::sms::SmsGateway;

/// Result of handling one delivery. The message is acknowledged in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Delivered,
    GatewayFailed,
    Malformed,
}

/// Standing worker forwarding envelopes from a subscription to the SMS gateway.
///
/// Failed sends are logged and acknowledged, never retried: the broker's
/// at-least-once delivery becomes at-most-once SMS delivery.
pub struct NotificationDispatcher<S, G: ?Sized> {
    subscription: S,
    gateway: Arc<G>,
    from_number: String,
}

impl<S, G> NotificationDispatcher<S, G>
where
    S: Subscription + 'static,
    G: SmsGateway + ?Sized + 'static,
{
    pub fn new(subscription: S, gateway: Arc<G>, from_number: impl Into<String>) -> Self {
        Self {
            subscription,
            gateway,
            from_number: from_number.into(),
        }
    }

    /// Run the receive loop on the current runtime until the subscription closes.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    pub async fn run(self) {
        info!(
            subscription = self.subscription.name(),
            "notification dispatcher started"
        );

        while let Some(delivery) = self.subscription.receive().await {
            self.handle(delivery).await;
        }

        info!(
            subscription = self.subscription.name(),
            "notification dispatcher stopped"
        );
    }

    pub async fn handle(&self, delivery: Delivery) -> DispatchOutcome {
        let message_id = delivery.message_id;
        let outcome = match Envelope::from_bytes(&delivery.payload) {
            Ok(envelope) => self.forward(&envelope, delivery.attempt).await,
            Err(err) => {
                warn!(%message_id, error = %err, "dropping undecodable notification");
                DispatchOutcome::Malformed
            }
        };

        if let Err(err) = self.subscription.ack(message_id) {
            warn!(%message_id, error = %err, "failed to acknowledge notification");
        }

        outcome
    }

    async fn forward(&self, envelope: &Envelope, attempt: u32) -> DispatchOutcome {
        match self
            .gateway
            .send(&self.from_number, &envelope.target_phone, &envelope.body)
            .await
        {
            Ok(()) => {
                info!(to = %envelope.target_phone, attempt, "sms sent");
                DispatchOutcome::Delivered
            }
            Err(err) => {
                warn!(to = %envelope.target_phone, attempt, error = %err, "sms send failed; dropping");
                DispatchOutcome::GatewayFailed
            }
        }
    }
}
