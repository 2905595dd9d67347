use crate::cli::ServeArgs;
use crate::infra::{notification_pipeline, sms_gateway, AppState};
use crate::routes::with_booking_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use interview_booking::config::AppConfig;
use interview_booking::error::AppError;
use interview_booking::telemetry;
use interview_booking::workflows::interviews::InterviewLifecycleService;
use interview_booking::workflows::notifications::{InMemoryBroker, NotificationDispatcher};
use interview_booking::workflows::parties::PartyRegistryService;
use interview_booking::workflows::store::InMemoryBookingStore;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryBookingStore::default());
    let broker = InMemoryBroker::new();
    let (publisher, subscription) = notification_pipeline(&broker, &config.notifications)?;

    let dispatcher = NotificationDispatcher::new(
        subscription,
        sms_gateway(&config.sms),
        config.sms.from_number(),
    )
    .spawn();

    let interviews = Arc::new(InterviewLifecycleService::new(
        store.clone(),
        Arc::new(publisher),
    ));
    let parties = Arc::new(PartyRegistryService::new(
        store,
        config.parties.country_code.clone(),
    ));

    let app = with_booking_routes(interviews, parties)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        topic = %config.notifications.topic,
        "interview booking service ready"
    );

    let served = axum::serve(listener, app).await;

    readiness_flag.store(false, Ordering::Release);
    broker.close();
    if let Err(err) = dispatcher.await {
        warn!(error = %err, "notification dispatcher ended abnormally");
    }

    served?;
    Ok(())
}
