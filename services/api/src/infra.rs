use interview_booking::config::{NotificationConfig, SmsConfig};
use interview_booking::workflows::notifications::{
    BrokerError, InMemoryBroker, InMemorySubscription, LogSmsGateway, SmsGateway, TopicPublisher,
    TwilioSmsGateway,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Declare the notification topic and attach the dispatcher's subscription to it.
pub(crate) fn notification_pipeline(
    broker: &InMemoryBroker,
    config: &NotificationConfig,
) -> Result<(TopicPublisher<InMemoryBroker>, InMemorySubscription), BrokerError> {
    broker.create_topic(&config.topic);
    let subscription = broker.subscribe(&config.topic, &config.subscription)?;
    let publisher = TopicPublisher::new(Arc::new(broker.clone()), config.topic.clone());
    Ok((publisher, subscription))
}

pub(crate) fn sms_gateway(config: &SmsConfig) -> Arc<dyn SmsGateway> {
    match &config.twilio {
        Some(twilio) => {
            info!(api_base = %twilio.api_base, "sms delivery via twilio");
            Arc::new(TwilioSmsGateway::new(twilio))
        }
        None => {
            info!("twilio credentials not configured; sms messages will only be logged");
            Arc::new(LogSmsGateway)
        }
    }
}
