use super::domain::{Party, PartyId, PartyRole};
use crate::workflows::store::RepositoryError;

/// Contact lookup consumed by the interview lifecycle.
pub trait PartyDirectory: Send + Sync {
    fn find_party(&self, role: PartyRole, id: PartyId) -> Result<Option<Party>, RepositoryError>;
}

/// Keyed storage for party records, one id space per role.
pub trait PartyRepository: PartyDirectory {
    /// Store a new party. An unset id is replaced with the next free id for the role.
    fn register_party(&self, role: PartyRole, party: Party) -> Result<Party, RepositoryError>;
    fn update_party(&self, role: PartyRole, party: Party) -> Result<Party, RepositoryError>;
    fn remove_party(&self, role: PartyRole, id: PartyId) -> Result<bool, RepositoryError>;
    fn parties(&self, role: PartyRole) -> Result<Vec<Party>, RepositoryError>;
}
