//! Shared persistence error type and the in-memory booking store.

mod memory;

pub use memory::InMemoryBookingStore;

use crate::workflows::parties::{PartyId, PartyRole};

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record {0} already exists")]
    DuplicateId(i64),
    #[error("{role} {party} is already booked at {scheduled_time}")]
    Booked {
        role: PartyRole,
        party: PartyId,
        scheduled_time: String,
    },
    #[error("phone number {0} is already registered")]
    DuplicatePhone(String),
    #[error("identifiers exhausted after {0}")]
    IdsExhausted(i64),
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
