use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use interview_booking::workflows::interviews::{interview_router, InterviewLifecycleService};
use interview_booking::workflows::notifications::{
    InMemoryBroker, NotificationDispatcher, SmsError, SmsGateway, TopicPublisher,
};
use interview_booking::workflows::parties::{party_router, PartyRegistryService};
use interview_booking::workflows::store::InMemoryBookingStore;
use serde_json::{json, Value};
use tower::ServiceExt;

const TOPIC: &str = "notification_topic";
const SENDER: &str = "+15550001111";

#[derive(Default)]
struct RecordingGateway {
    sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingGateway {
    fn sent(&self) -> Vec<(String, String, String)> {
        self.sent.lock().expect("gateway mutex").clone()
    }
}

#[async_trait]
impl SmsGateway for RecordingGateway {
    async fn send(&self, from: &str, to: &str, body: &str) -> Result<(), SmsError> {
        self.sent
            .lock()
            .expect("gateway mutex")
            .push((from.to_string(), to.to_string(), body.to_string()));
        Ok(())
    }
}

struct Pipeline {
    router: Router,
    broker: InMemoryBroker,
    gateway: Arc<RecordingGateway>,
    worker: tokio::task::JoinHandle<()>,
}

fn pipeline() -> Pipeline {
    let store = Arc::new(InMemoryBookingStore::default());
    let broker = InMemoryBroker::new();
    broker.create_topic(TOPIC);
    let subscription = broker
        .subscribe(TOPIC, "notification_subscription")
        .expect("subscribe");

    let gateway = Arc::new(RecordingGateway::default());
    let worker = NotificationDispatcher::new(subscription, gateway.clone(), SENDER).spawn();

    let publisher = Arc::new(TopicPublisher::new(Arc::new(broker.clone()), TOPIC));
    let interviews = Arc::new(InterviewLifecycleService::new(store.clone(), publisher));
    let parties = Arc::new(PartyRegistryService::new(store, "91"));

    Pipeline {
        router: interview_router(interviews).merge(party_router(parties)),
        broker,
        gateway,
        worker,
    }
}

async fn post(router: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(
            Request::post(path)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

async fn register_parties(router: &Router) {
    for (path, phone) in [
        ("/interviewer", "+919000000001"),
        ("/hr", "+919000000002"),
        ("/candidate", "+919000000003"),
    ] {
        let (status, _) = post(router, path, json!({ "name": path, "phone_number": phone })).await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

#[tokio::test]
async fn booking_fans_out_one_sms_per_participant() {
    let pipeline = pipeline();
    register_parties(&pipeline.router).await;

    let (status, payload) = post(
        &pipeline.router,
        "/interview",
        json!({
            "interviewer_id": 1,
            "candidate_id": 1,
            "hr_id": 1,
            "scheduled_time": "2026-11-02 10:00",
            "interview_link": "https://meet.example/abc",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{payload}");

    pipeline.broker.close();
    pipeline.worker.await.expect("dispatcher exits");

    let body = "You have an interview scheduled at 2026-11-02 10:00 https://meet.example/abc";
    let expected: Vec<(String, String, String)> =
        ["+919000000001", "+919000000002", "+919000000003"]
            .into_iter()
            .map(|to| (SENDER.to_string(), to.to_string(), body.to_string()))
            .collect();
    assert_eq!(pipeline.gateway.sent(), expected);
}

#[tokio::test]
async fn rejected_booking_sends_nothing() {
    let pipeline = pipeline();
    register_parties(&pipeline.router).await;

    let booking = json!({
        "interviewer_id": 1,
        "candidate_id": 1,
        "hr_id": 1,
        "scheduled_time": "2026-11-02 10:00",
        "interview_link": "https://meet.example/abc",
    });
    let (status, _) = post(&pipeline.router, "/interview", booking.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, payload) = post(&pipeline.router, "/interview", booking).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        payload["error"],
        "Interviewer has another interview scheduled at the same time"
    );

    pipeline.broker.close();
    pipeline.worker.await.expect("dispatcher exits");
    assert_eq!(pipeline.gateway.sent().len(), 3);
    assert_eq!(
        pipeline
            .broker
            .stats("notification_subscription")
            .map(|stats| stats.acknowledged),
        Some(3)
    );
}
