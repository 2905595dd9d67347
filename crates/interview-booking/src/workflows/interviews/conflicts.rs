use std::sync::Arc;

use super::domain::Interview;
use super::repository::InterviewRepository;
use crate::workflows::parties::{PartyId, PartyRole};
use crate::workflows::store::RepositoryError;

/// Read-only double-booking predicate over persisted interviews.
///
/// Party ids are matched against every role column, so an interviewer and a
/// candidate that happen to share an id are treated as one participant.
pub struct ConflictChecker<R: ?Sized> {
    repository: Arc<R>,
}

impl<R> ConflictChecker<R>
where
    R: InterviewRepository + ?Sized,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn has_conflict(
        &self,
        party: PartyId,
        scheduled_time: &str,
    ) -> Result<bool, RepositoryError> {
        Ok(self.repository.count_scheduled(party, scheduled_time)? > 0)
    }

    /// First participant (interviewer, then HR, then candidate) already booked at the slot.
    pub fn first_conflict(
        &self,
        interview: &Interview,
    ) -> Result<Option<PartyRole>, RepositoryError> {
        for (role, party) in interview.participants() {
            if self.has_conflict(party, &interview.scheduled_time)? {
                return Ok(Some(role));
            }
        }
        Ok(None)
    }
}
