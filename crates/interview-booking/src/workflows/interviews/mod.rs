//! Interview booking lifecycle: conflict detection, persistence, and participant notification.

mod conflicts;
pub mod domain;
pub mod links;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use conflicts::ConflictChecker;
pub use domain::{Interview, InterviewId, InterviewRequest};
pub use links::{generate_link, LinkError, LinkGenerator, SecureLinkGenerator};
pub use repository::InterviewRepository;
pub use router::interview_router;
pub use service::{InterviewLifecycleService, InterviewServiceError};
