//! Notification fan-out: envelopes are published to a broker topic and a standing
//! dispatcher forwards them to the SMS gateway.

pub mod broker;
pub mod dispatcher;
pub mod envelope;
pub mod publisher;
pub mod sms;

pub use broker::{
    BrokerError, Delivery, InMemoryBroker, InMemorySubscription, MessageBroker, MessageId,
    Subscription, SubscriptionStats,
};
pub use dispatcher::{DispatchOutcome, NotificationDispatcher};
pub use envelope::Envelope;
pub use publisher::{NotificationPublisher, PublishError, TopicPublisher};
pub use sms::{LogSmsGateway, SmsError, SmsGateway, TwilioSmsGateway};
