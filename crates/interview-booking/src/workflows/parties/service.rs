use std::sync::Arc;

use tracing::info;

use super::domain::{validate_phone_number, Party, PartyId, PartyRole, PhoneNumberError};
use super::repository::{PartyDirectory, PartyRepository};
use crate::workflows::store::RepositoryError;

/// CRUD over interviewers, candidates, and HR contacts with phone validation.
pub struct PartyRegistryService<R> {
    repository: Arc<R>,
    country_code: String,
}

impl<R> PartyRegistryService<R>
where
    R: PartyRepository + 'static,
{
    pub fn new(repository: Arc<R>, country_code: impl Into<String>) -> Self {
        Self {
            repository,
            country_code: country_code.into(),
        }
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub fn register(&self, role: PartyRole, party: Party) -> Result<Party, PartyServiceError> {
        validate_phone_number(&party.phone_number, &self.country_code)?;
        let requested = party.id;
        if requested.0 < 0 {
            return Err(PartyServiceError::InvalidId {
                role,
                id: requested,
            });
        }
        let stored = self
            .repository
            .register_party(role, party)
            .map_err(|err| PartyServiceError::from_repository(err, role, requested))?;
        info!(%role, party_id = %stored.id, "party registered");
        Ok(stored)
    }

    pub fn get(&self, role: PartyRole, id: PartyId) -> Result<Party, PartyServiceError> {
        self.repository
            .find_party(role, id)?
            .ok_or(PartyServiceError::NotFound { role, id })
    }

    pub fn list(&self, role: PartyRole) -> Result<Vec<Party>, PartyServiceError> {
        Ok(self.repository.parties(role)?)
    }

    /// Replace the stored record for `id`. The id in the payload is ignored.
    pub fn update(
        &self,
        role: PartyRole,
        id: PartyId,
        mut party: Party,
    ) -> Result<Party, PartyServiceError> {
        validate_phone_number(&party.phone_number, &self.country_code)?;
        party.id = id;
        let stored = self
            .repository
            .update_party(role, party)
            .map_err(|err| PartyServiceError::from_repository(err, role, id))?;
        info!(%role, party_id = %stored.id, "party updated");
        Ok(stored)
    }

    /// Remove a party. Interviews referencing it are left untouched.
    pub fn delete(&self, role: PartyRole, id: PartyId) -> Result<bool, PartyServiceError> {
        let removed = self.repository.remove_party(role, id)?;
        info!(%role, party_id = %id, removed, "party deleted");
        Ok(removed)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PartyServiceError {
    #[error(transparent)]
    InvalidPhone(#[from] PhoneNumberError),
    #[error("{role} id {id} must be positive, or omitted to assign one")]
    InvalidId { role: PartyRole, id: PartyId },
    #[error("Phone number is already registered for another {role}")]
    PhoneTaken { role: PartyRole },
    #[error("{role} {id} not found")]
    NotFound { role: PartyRole, id: PartyId },
    #[error("{role} {id} already exists")]
    DuplicateId { role: PartyRole, id: PartyId },
    #[error("no {role} ids left")]
    IdsExhausted { role: PartyRole },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl PartyServiceError {
    fn from_repository(err: RepositoryError, role: PartyRole, id: PartyId) -> Self {
        match err {
            RepositoryError::DuplicatePhone(_) => Self::PhoneTaken { role },
            RepositoryError::DuplicateId(_) => Self::DuplicateId { role, id },
            RepositoryError::NotFound => Self::NotFound { role, id },
            RepositoryError::IdsExhausted(_) => Self::IdsExhausted { role },
            other => Self::Repository(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::store::InMemoryBookingStore;

    fn registry() -> PartyRegistryService<InMemoryBookingStore> {
        PartyRegistryService::new(Arc::new(InMemoryBookingStore::default()), "91")
    }

    fn party(name: &str, phone: &str) -> Party {
        Party {
            name: name.to_string(),
            phone_number: phone.to_string(),
            ..Party::default()
        }
    }

    #[test]
    fn assigns_ids_per_role() {
        let registry = registry();
        let first = registry
            .register(PartyRole::Interviewer, party("Asha", "+919876543210"))
            .expect("register interviewer");
        let second = registry
            .register(PartyRole::Candidate, party("Ravi", "+919876543211"))
            .expect("register candidate");

        assert_eq!(first.id, PartyId(1));
        assert_eq!(second.id, PartyId(1));
        assert_eq!(registry.list(PartyRole::Interviewer).expect("list").len(), 1);
    }

    #[test]
    fn rejects_malformed_phone() {
        let err = registry()
            .register(PartyRole::Hr, party("Meera", "9876543210"))
            .expect_err("missing country code");
        assert!(matches!(err, PartyServiceError::InvalidPhone(_)));
        assert_eq!(
            err.to_string(),
            "Invalid phone number format. Phone number should start with '+91' and have 10 additional digits."
        );
    }

    #[test]
    fn phone_is_unique_within_role_only() {
        let registry = registry();
        registry
            .register(PartyRole::Hr, party("Meera", "+919876543210"))
            .expect("first hr");
        registry
            .register(PartyRole::Candidate, party("Meera", "+919876543210"))
            .expect("same phone in another role");

        let err = registry
            .register(PartyRole::Hr, party("Other", "+919876543210"))
            .expect_err("duplicate phone in role");
        assert_eq!(
            err.to_string(),
            "Phone number is already registered for another HR"
        );
    }

    #[test]
    fn duplicate_explicit_id_is_reported() {
        let registry = registry();
        let mut first = party("Asha", "+919876543210");
        first.id = PartyId(5);
        registry
            .register(PartyRole::Interviewer, first)
            .expect("register");

        let mut second = party("Dev", "+919876543211");
        second.id = PartyId(5);
        let err = registry
            .register(PartyRole::Interviewer, second)
            .expect_err("duplicate id");
        assert!(matches!(
            err,
            PartyServiceError::DuplicateId {
                role: PartyRole::Interviewer,
                id: PartyId(5)
            }
        ));
    }

    #[test]
    fn negative_id_is_rejected() {
        let registry = registry();
        let mut negative = party("Asha", "+919876543210");
        negative.id = PartyId(-5);

        let err = registry
            .register(PartyRole::Interviewer, negative)
            .expect_err("negative id");
        assert!(matches!(
            err,
            PartyServiceError::InvalidId {
                role: PartyRole::Interviewer,
                id: PartyId(-5)
            }
        ));
        assert!(registry
            .list(PartyRole::Interviewer)
            .expect("list")
            .is_empty());
    }

    #[test]
    fn exhausted_id_space_is_reported() {
        let registry = registry();
        let mut highest = party("Asha", "+919876543210");
        highest.id = PartyId(i64::MAX);
        registry
            .register(PartyRole::Candidate, highest)
            .expect("highest id");

        let err = registry
            .register(PartyRole::Candidate, party("Ravi", "+919876543211"))
            .expect_err("no id left to assign");
        assert!(matches!(
            err,
            PartyServiceError::IdsExhausted {
                role: PartyRole::Candidate
            }
        ));
    }

    #[test]
    fn update_overwrites_and_keeps_path_id() {
        let registry = registry();
        let stored = registry
            .register(PartyRole::Candidate, party("Ravi", "+919876543210"))
            .expect("register");

        let mut replacement = party("Ravi K", "+919876543219");
        replacement.id = PartyId(99);
        let updated = registry
            .update(PartyRole::Candidate, stored.id, replacement)
            .expect("update");

        assert_eq!(updated.id, stored.id);
        assert_eq!(
            registry
                .get(PartyRole::Candidate, stored.id)
                .expect("fetch")
                .phone_number,
            "+919876543219"
        );
    }

    #[test]
    fn update_and_get_of_missing_party_are_not_found() {
        let registry = registry();
        assert!(matches!(
            registry.get(PartyRole::Hr, PartyId(3)),
            Err(PartyServiceError::NotFound { .. })
        ));
        assert!(matches!(
            registry.update(PartyRole::Hr, PartyId(3), party("X", "+919876543210")),
            Err(PartyServiceError::NotFound { .. })
        ));
    }

    #[test]
    fn delete_of_missing_party_succeeds() {
        assert!(!registry()
            .delete(PartyRole::Interviewer, PartyId(42))
            .expect("delete is idempotent"));
    }
}
