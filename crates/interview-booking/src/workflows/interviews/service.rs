use std::sync::Arc;

use tracing::{debug, info, warn};

use super::conflicts::ConflictChecker;
use super::domain::{Interview, InterviewId, InterviewRequest};
use super::links::{LinkError, LinkGenerator, SecureLinkGenerator};
use super::repository::InterviewRepository;
use crate::workflows::notifications::{Envelope, NotificationPublisher, PublishError};
use crate::workflows::parties::{Party, PartyDirectory, PartyId, PartyRole};
use crate::workflows::store::RepositoryError;

/// Orchestrates create, reschedule, and delete for interview bookings.
///
/// The conflict check and the insert run as separate store calls; the store is
/// responsible for rejecting a booking that slips in between them. Notifications
/// are published after the row is committed and a publish failure does not undo
/// the write.
pub struct InterviewLifecycleService<S, P> {
    store: Arc<S>,
    publisher: Arc<P>,
    checker: ConflictChecker<S>,
    links: Arc<dyn LinkGenerator>,
}

/// Contact records for the three participants of one interview.
#[derive(Debug, Clone)]
struct Participants {
    interviewer: Party,
    hr: Party,
    candidate: Party,
}

impl Participants {
    fn in_notification_order(&self) -> [(PartyRole, &Party); 3] {
        [
            (PartyRole::Interviewer, &self.interviewer),
            (PartyRole::Hr, &self.hr),
            (PartyRole::Candidate, &self.candidate),
        ]
    }
}

impl<S, P> InterviewLifecycleService<S, P>
where
    S: InterviewRepository + PartyDirectory + 'static,
    P: NotificationPublisher + 'static,
{
    pub fn new(store: Arc<S>, publisher: Arc<P>) -> Self {
        let checker = ConflictChecker::new(Arc::clone(&store));
        Self {
            store,
            publisher,
            checker,
            links: Arc::new(SecureLinkGenerator),
        }
    }

    pub fn with_link_generator(mut self, links: Arc<dyn LinkGenerator>) -> Self {
        self.links = links;
        self
    }

    /// Book a new interview and notify all three participants.
    pub fn create(&self, request: InterviewRequest) -> Result<Interview, InterviewServiceError> {
        if request.missing_participant() {
            return Err(InterviewServiceError::MissingParticipant);
        }
        if request.id.0 < 0 {
            return Err(InterviewServiceError::InvalidId(request.id));
        }

        let id = request.id;
        let interview = request.into_interview(id);

        if let Some(role) = self.checker.first_conflict(&interview)? {
            info!(%role, scheduled_time = %interview.scheduled_time, "booking rejected: participant already scheduled");
            return Err(InterviewServiceError::Conflict { role });
        }

        let stored = self.store.insert(interview)?;
        info!(
            interview_id = %stored.id,
            interviewer_id = %stored.interviewer_id,
            hr_id = %stored.hr_id,
            candidate_id = %stored.candidate_id,
            scheduled_time = %stored.scheduled_time,
            "interview booked"
        );

        let participants = self.resolve_participants(&stored)?;

        // The stored link stays the one the client supplied.
        let generated = self.links.generate()?;
        debug!(interview_id = %stored.id, %generated, "join link generated");

        self.notify(&stored, &participants, &scheduled_message(&stored))?;
        Ok(stored)
    }

    /// Overwrite an interview's fields and notify participants. No conflict check runs here.
    pub fn reschedule(
        &self,
        id: InterviewId,
        request: InterviewRequest,
    ) -> Result<Interview, InterviewServiceError> {
        let interview = request.into_interview(id);
        let stored = self.store.update(interview).map_err(|err| match err {
            RepositoryError::NotFound => InterviewServiceError::InterviewNotFound(id),
            other => other.into(),
        })?;
        info!(
            interview_id = %stored.id,
            scheduled_time = %stored.scheduled_time,
            "interview rescheduled"
        );

        let participants = self.resolve_participants(&stored)?;
        self.notify(&stored, &participants, &rescheduled_message(&stored))?;
        Ok(stored)
    }

    /// Remove an interview. Returns whether a row existed; nobody is notified.
    pub fn delete(&self, id: InterviewId) -> Result<bool, InterviewServiceError> {
        let removed = self.store.delete(id)?;
        info!(interview_id = %id, removed, "interview deleted");
        Ok(removed)
    }

    pub fn get(&self, id: InterviewId) -> Result<Interview, InterviewServiceError> {
        self.store
            .fetch(id)?
            .ok_or(InterviewServiceError::InterviewNotFound(id))
    }

    pub fn list(&self) -> Result<Vec<Interview>, InterviewServiceError> {
        Ok(self.store.list()?)
    }
}

impl<S, P> InterviewLifecycleService<S, P>
where
    S: InterviewRepository + PartyDirectory + 'static,
    P: NotificationPublisher + 'static,
{
    fn resolve_participants(
        &self,
        interview: &Interview,
    ) -> Result<Participants, InterviewServiceError> {
        Ok(Participants {
            interviewer: self.resolve(PartyRole::Interviewer, interview.interviewer_id)?,
            hr: self.resolve(PartyRole::Hr, interview.hr_id)?,
            candidate: self.resolve(PartyRole::Candidate, interview.candidate_id)?,
        })
    }

    fn resolve(&self, role: PartyRole, id: PartyId) -> Result<Party, InterviewServiceError> {
        self.store
            .find_party(role, id)?
            .ok_or(InterviewServiceError::PartyNotFound { role, id })
    }

    fn notify(
        &self,
        interview: &Interview,
        participants: &Participants,
        body: &str,
    ) -> Result<(), InterviewServiceError> {
        for (role, party) in participants.in_notification_order() {
            let envelope = Envelope::new(party.phone_number.clone(), body);
            if let Err(err) = self.publisher.publish(&envelope) {
                warn!(
                    interview_id = %interview.id,
                    %role,
                    error = %err,
                    "notification fan-out aborted; interview remains stored"
                );
                return Err(err.into());
            }
        }
        Ok(())
    }
}

fn scheduled_message(interview: &Interview) -> String {
    format!(
        "You have an interview scheduled at {} {}",
        interview.scheduled_time, interview.interview_link
    )
}

fn rescheduled_message(interview: &Interview) -> String {
    format!(
        "Updated interview schedule: {} {}",
        interview.scheduled_time, interview.interview_link
    )
}

/// Error raised by the interview lifecycle service.
#[derive(Debug, thiserror::Error)]
pub enum InterviewServiceError {
    #[error("interviewer, candidate, or HR id is missing or zero")]
    MissingParticipant,
    #[error("interview id {0} must be positive, or omitted to assign one")]
    InvalidId(InterviewId),
    #[error("{role} has another interview scheduled at the same time")]
    Conflict { role: PartyRole },
    #[error("{role} {id} not found")]
    PartyNotFound { role: PartyRole, id: PartyId },
    #[error("interview {0} not found")]
    InterviewNotFound(InterviewId),
    #[error("interview {0} already exists")]
    DuplicateInterview(InterviewId),
    #[error("no interview ids left after {0}")]
    IdsExhausted(InterviewId),
    #[error(transparent)]
    Repository(RepositoryError),
    #[error(transparent)]
    Publish(#[from] PublishError),
    #[error(transparent)]
    Link(#[from] LinkError),
}

impl From<RepositoryError> for InterviewServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Booked { role, .. } => Self::Conflict { role },
            RepositoryError::DuplicateId(id) => Self::DuplicateInterview(InterviewId(id)),
            RepositoryError::IdsExhausted(id) => Self::IdsExhausted(InterviewId(id)),
            other => Self::Repository(other),
        }
    }
}
