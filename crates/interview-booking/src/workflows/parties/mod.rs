//! Interviewer, candidate, and HR contact registry.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{validate_phone_number, Party, PartyId, PartyRole, PhoneNumberError};
pub use repository::{PartyDirectory, PartyRepository};
pub use router::party_router;
pub use service::{PartyRegistryService, PartyServiceError};
