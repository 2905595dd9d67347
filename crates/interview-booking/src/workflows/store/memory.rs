use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::RepositoryError;
use crate::workflows::interviews::{Interview, InterviewId, InterviewRepository};
use crate::workflows::parties::{Party, PartyDirectory, PartyId, PartyRepository, PartyRole};

/// Process-local store for parties and interviews.
///
/// Both record kinds share one lock so an interview insert can re-validate the
/// booking invariant against the rows it is about to join.
#[derive(Debug, Default, Clone)]
pub struct InMemoryBookingStore {
    state: Arc<Mutex<StoreState>>,
}

#[derive(Debug, Default)]
struct StoreState {
    interviews: BTreeMap<InterviewId, Interview>,
    parties: BTreeMap<(PartyRole, PartyId), Party>,
}

impl StoreState {
    fn next_interview_id(&self) -> Result<InterviewId, RepositoryError> {
        let highest = self.interviews.keys().next_back().map_or(0, |id| id.0);
        successor(highest).map(InterviewId)
    }

    fn next_party_id(&self, role: PartyRole) -> Result<PartyId, RepositoryError> {
        let highest = self
            .parties
            .keys()
            .filter(|(r, _)| *r == role)
            .map(|(_, id)| id.0)
            .max()
            .unwrap_or(0);
        successor(highest).map(PartyId)
    }

    fn first_booked(&self, interview: &Interview) -> Option<(PartyRole, PartyId)> {
        interview.participants().into_iter().find(|(_, party)| {
            self.interviews
                .values()
                .any(|existing| existing.occupies(*party, &interview.scheduled_time))
        })
    }

    fn phone_owner(&self, role: PartyRole, phone: &str) -> Option<&Party> {
        self.parties
            .iter()
            .find(|((r, _), party)| *r == role && party.phone_number == phone)
            .map(|(_, party)| party)
    }
}

fn successor(highest: i64) -> Result<i64, RepositoryError> {
    highest
        .max(0)
        .checked_add(1)
        .ok_or(RepositoryError::IdsExhausted(highest))
}

impl InMemoryBookingStore {
    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl InterviewRepository for InMemoryBookingStore {
    fn insert(&self, mut interview: Interview) -> Result<Interview, RepositoryError> {
        let mut state = self.lock();
        if interview.id.is_unset() {
            interview.id = state.next_interview_id()?;
        } else if state.interviews.contains_key(&interview.id) {
            return Err(RepositoryError::DuplicateId(interview.id.0));
        }

        if let Some((role, party)) = state.first_booked(&interview) {
            return Err(RepositoryError::Booked {
                role,
                party,
                scheduled_time: interview.scheduled_time,
            });
        }

        state.interviews.insert(interview.id, interview.clone());
        Ok(interview)
    }

    fn update(&self, interview: Interview) -> Result<Interview, RepositoryError> {
        let mut state = self.lock();
        match state.interviews.get_mut(&interview.id) {
            Some(slot) => {
                *slot = interview.clone();
                Ok(interview)
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn delete(&self, id: InterviewId) -> Result<bool, RepositoryError> {
        Ok(self.lock().interviews.remove(&id).is_some())
    }

    fn fetch(&self, id: InterviewId) -> Result<Option<Interview>, RepositoryError> {
        Ok(self.lock().interviews.get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<Interview>, RepositoryError> {
        Ok(self.lock().interviews.values().cloned().collect())
    }

    fn count_scheduled(
        &self,
        party: PartyId,
        scheduled_time: &str,
    ) -> Result<usize, RepositoryError> {
        Ok(self
            .lock()
            .interviews
            .values()
            .filter(|interview| interview.occupies(party, scheduled_time))
            .count())
    }
}

impl PartyDirectory for InMemoryBookingStore {
    fn find_party(&self, role: PartyRole, id: PartyId) -> Result<Option<Party>, RepositoryError> {
        Ok(self.lock().parties.get(&(role, id)).cloned())
    }
}

impl PartyRepository for InMemoryBookingStore {
    fn register_party(&self, role: PartyRole, mut party: Party) -> Result<Party, RepositoryError> {
        let mut state = self.lock();
        if party.id.is_unset() {
            party.id = state.next_party_id(role)?;
        } else if state.parties.contains_key(&(role, party.id)) {
            return Err(RepositoryError::DuplicateId(party.id.0));
        }

        if state.phone_owner(role, &party.phone_number).is_some() {
            return Err(RepositoryError::DuplicatePhone(party.phone_number));
        }

        state.parties.insert((role, party.id), party.clone());
        Ok(party)
    }

    fn update_party(&self, role: PartyRole, party: Party) -> Result<Party, RepositoryError> {
        let mut state = self.lock();
        if !state.parties.contains_key(&(role, party.id)) {
            return Err(RepositoryError::NotFound);
        }

        if let Some(owner) = state.phone_owner(role, &party.phone_number) {
            if owner.id != party.id {
                return Err(RepositoryError::DuplicatePhone(party.phone_number));
            }
        }

        state.parties.insert((role, party.id), party.clone());
        Ok(party)
    }

    fn remove_party(&self, role: PartyRole, id: PartyId) -> Result<bool, RepositoryError> {
        Ok(self.lock().parties.remove(&(role, id)).is_some())
    }

    fn parties(&self, role: PartyRole) -> Result<Vec<Party>, RepositoryError> {
        Ok(self
            .lock()
            .parties
            .iter()
            .filter(|((r, _), _)| *r == role)
            .map(|(_, party)| party.clone())
            .collect())
    }
}
