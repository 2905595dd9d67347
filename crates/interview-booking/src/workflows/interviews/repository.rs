use super::domain::{Interview, InterviewId};
use crate::workflows::parties::PartyId;
use crate::workflows::store::RepositoryError;

/// Storage abstraction so the lifecycle service can be exercised in isolation.
///
/// `insert` is the only write that guards the booking invariant; `update` stores
/// whatever it is given.
pub trait InterviewRepository: Send + Sync {
    /// Persist a new interview, assigning an id when the given one is unset.
    fn insert(&self, interview: Interview) -> Result<Interview, RepositoryError>;
    fn update(&self, interview: Interview) -> Result<Interview, RepositoryError>;
    fn delete(&self, id: InterviewId) -> Result<bool, RepositoryError>;
    fn fetch(&self, id: InterviewId) -> Result<Option<Interview>, RepositoryError>;
    fn list(&self) -> Result<Vec<Interview>, RepositoryError>;
    /// Number of interviews holding `party` in any role column at exactly `scheduled_time`.
    fn count_scheduled(&self, party: PartyId, scheduled_time: &str)
        -> Result<usize, RepositoryError>;
}
