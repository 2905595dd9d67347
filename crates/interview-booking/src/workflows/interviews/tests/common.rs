use std::collections::BTreeMap;
use std::sync::{Arc, Barrier, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::interviews::links::{LinkError, LinkGenerator};
use crate::workflows::interviews::{
    interview_router, Interview, InterviewId, InterviewLifecycleService, InterviewRepository,
    InterviewRequest,
};
use crate::workflows::notifications::{BrokerError, Envelope, NotificationPublisher, PublishError};
use crate::workflows::parties::{Party, PartyDirectory, PartyId, PartyRepository, PartyRole};
use crate::workflows::store::{InMemoryBookingStore, RepositoryError};

pub(super) const SLOT: &str = "2026-11-02 10:00";
pub(super) const LINK: &str = "https://meet.example/abc";

/// Registers ids 1..=3 in every role with distinct phone numbers.
pub(super) fn seed_parties<R: PartyRepository>(repository: &R) {
    for role in PartyRole::ALL {
        for id in 1..=3 {
            repository
                .register_party(
                    role,
                    Party {
                        id: PartyId(id),
                        name: format!("{}-{id}", role.path_segment()),
                        phone_number: phone(role, id),
                    },
                )
                .unwrap_or_else(|err| panic!("seed {role} {id}: {err}"));
        }
    }
}

pub(super) fn phone(role: PartyRole, id: i64) -> String {
    let digit = match role {
        PartyRole::Interviewer => 1,
        PartyRole::Candidate => 2,
        PartyRole::Hr => 3,
    };
    format!("+91987654{digit}{id:03}")
}

pub(super) fn request(interviewer: i64, candidate: i64, hr: i64, at: &str) -> InterviewRequest {
    InterviewRequest {
        interviewer_id: PartyId(interviewer),
        candidate_id: PartyId(candidate),
        hr_id: PartyId(hr),
        scheduled_time: at.to_string(),
        interview_link: LINK.to_string(),
        ..InterviewRequest::default()
    }
}

pub(super) type MemoryService = InterviewLifecycleService<InMemoryBookingStore, MemoryPublisher>;

pub(super) fn build_service() -> (MemoryService, Arc<InMemoryBookingStore>, Arc<MemoryPublisher>) {
    let store = Arc::new(InMemoryBookingStore::default());
    seed_parties(store.as_ref());
    let publisher = Arc::new(MemoryPublisher::default());
    let service = InterviewLifecycleService::new(store.clone(), publisher.clone())
        .with_link_generator(Arc::new(FixedLinks));
    (service, store, publisher)
}

pub(super) fn interview_router_with_service(service: MemoryService) -> axum::Router {
    interview_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[derive(Default, Clone)]
pub(super) struct MemoryPublisher {
    envelopes: Arc<Mutex<Vec<Envelope>>>,
}

impl MemoryPublisher {
    pub(super) fn envelopes(&self) -> Vec<Envelope> {
        self.envelopes
            .lock()
            .expect("publisher mutex poisoned")
            .clone()
    }
}

impl NotificationPublisher for MemoryPublisher {
    fn publish(&self, envelope: &Envelope) -> Result<(), PublishError> {
        self.envelopes
            .lock()
            .expect("publisher mutex poisoned")
            .push(envelope.clone());
        Ok(())
    }
}

/// Accepts `accept` envelopes, then reports the broker as unavailable.
pub(super) struct FailingPublisher {
    accept: usize,
    published: Mutex<usize>,
}

impl FailingPublisher {
    pub(super) fn after(accept: usize) -> Self {
        Self {
            accept,
            published: Mutex::new(0),
        }
    }

    pub(super) fn published(&self) -> usize {
        *self.published.lock().expect("publisher mutex poisoned")
    }
}

impl NotificationPublisher for FailingPublisher {
    fn publish(&self, _envelope: &Envelope) -> Result<(), PublishError> {
        let mut published = self.published.lock().expect("publisher mutex poisoned");
        if *published >= self.accept {
            return Err(PublishError::Broker(BrokerError::Unavailable(
                "topic offline".to_string(),
            )));
        }
        *published += 1;
        Ok(())
    }
}

pub(super) struct FixedLinks;

impl LinkGenerator for FixedLinks {
    fn generate(&self) -> Result<String, LinkError> {
        Ok("https://generated00000000000".to_string())
    }
}

pub(super) struct BrokenLinks;

impl LinkGenerator for BrokenLinks {
    fn generate(&self) -> Result<String, LinkError> {
        Err(LinkError::RandomSource("entropy pool drained".to_string()))
    }
}

/// Store that only offers the read-side conflict predicate and never re-checks on insert.
#[derive(Default)]
pub(super) struct UncheckedStore {
    interviews: Mutex<BTreeMap<InterviewId, Interview>>,
    parties: InMemoryBookingStore,
}

impl UncheckedStore {
    pub(super) fn seeded() -> Self {
        let store = Self::default();
        seed_parties(&store.parties);
        store
    }
}

impl InterviewRepository for UncheckedStore {
    fn insert(&self, mut interview: Interview) -> Result<Interview, RepositoryError> {
        let mut guard = self.interviews.lock().expect("store mutex poisoned");
        if interview.id.is_unset() {
            interview.id = InterviewId(guard.keys().next_back().map_or(1, |id| id.0 + 1));
        }
        guard.insert(interview.id, interview.clone());
        Ok(interview)
    }

    fn update(&self, interview: Interview) -> Result<Interview, RepositoryError> {
        let mut guard = self.interviews.lock().expect("store mutex poisoned");
        match guard.get_mut(&interview.id) {
            Some(slot) => {
                *slot = interview.clone();
                Ok(interview)
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn delete(&self, id: InterviewId) -> Result<bool, RepositoryError> {
        Ok(self
            .interviews
            .lock()
            .expect("store mutex poisoned")
            .remove(&id)
            .is_some())
    }

    fn fetch(&self, id: InterviewId) -> Result<Option<Interview>, RepositoryError> {
        Ok(self
            .interviews
            .lock()
            .expect("store mutex poisoned")
            .get(&id)
            .cloned())
    }

    fn list(&self) -> Result<Vec<Interview>, RepositoryError> {
        Ok(self
            .interviews
            .lock()
            .expect("store mutex poisoned")
            .values()
            .cloned()
            .collect())
    }

    fn count_scheduled(
        &self,
        party: PartyId,
        scheduled_time: &str,
    ) -> Result<usize, RepositoryError> {
        Ok(self
            .interviews
            .lock()
            .expect("store mutex poisoned")
            .values()
            .filter(|interview| interview.occupies(party, scheduled_time))
            .count())
    }
}

impl PartyDirectory for UncheckedStore {
    fn find_party(&self, role: PartyRole, id: PartyId) -> Result<Option<Party>, RepositoryError> {
        self.parties.find_party(role, id)
    }
}

/// Holds every insert until two callers have reached it, so both have already
/// passed the conflict check.
pub(super) struct RacingStore<S> {
    inner: S,
    gate: Barrier,
}

impl<S> RacingStore<S> {
    pub(super) fn new(inner: S) -> Self {
        Self {
            inner,
            gate: Barrier::new(2),
        }
    }
}

impl<S: InterviewRepository> InterviewRepository for RacingStore<S> {
    fn insert(&self, interview: Interview) -> Result<Interview, RepositoryError> {
        self.gate.wait();
        self.inner.insert(interview)
    }

    fn update(&self, interview: Interview) -> Result<Interview, RepositoryError> {
        self.inner.update(interview)
    }

    fn delete(&self, id: InterviewId) -> Result<bool, RepositoryError> {
        self.inner.delete(id)
    }

    fn fetch(&self, id: InterviewId) -> Result<Option<Interview>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn list(&self) -> Result<Vec<Interview>, RepositoryError> {
        self.inner.list()
    }

    fn count_scheduled(
        &self,
        party: PartyId,
        scheduled_time: &str,
    ) -> Result<usize, RepositoryError> {
        self.inner.count_scheduled(party, scheduled_time)
    }
}

impl<S: PartyDirectory> PartyDirectory for RacingStore<S> {
    fn find_party(&self, role: PartyRole, id: PartyId) -> Result<Option<Party>, RepositoryError> {
        self.inner.find_party(role, id)
    }
}

/// Every read and write fails as if the database were offline.
pub(super) struct UnavailableStore;

impl InterviewRepository for UnavailableStore {
    fn insert(&self, _interview: Interview) -> Result<Interview, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _interview: Interview) -> Result<Interview, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: InterviewId) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: InterviewId) -> Result<Option<Interview>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Interview>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn count_scheduled(
        &self,
        _party: PartyId,
        _scheduled_time: &str,
    ) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl PartyDirectory for UnavailableStore {
    fn find_party(
        &self,
        _role: PartyRole,
        _id: PartyId,
    ) -> Result<Option<Party>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
