use std::fmt;

use serde::{Deserialize, Serialize};

use crate::workflows::parties::{PartyId, PartyRole};

/// Identifier wrapper for interviews. Zero asks the store to assign one.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct InterviewId(pub i64);

impl InterviewId {
    pub fn is_unset(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for InterviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted interview booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interview {
    pub id: InterviewId,
    pub interviewer_id: PartyId,
    pub candidate_id: PartyId,
    pub hr_id: PartyId,
    /// Opaque slot label; compared by exact string equality.
    pub scheduled_time: String,
    pub rescheduled: bool,
    pub interview_link: String,
}

impl Interview {
    /// Participants in conflict-check and notification order.
    pub fn participants(&self) -> [(PartyRole, PartyId); 3] {
        [
            (PartyRole::Interviewer, self.interviewer_id),
            (PartyRole::Hr, self.hr_id),
            (PartyRole::Candidate, self.candidate_id),
        ]
    }

    /// Role-agnostic membership: the id may sit in any of the three columns.
    pub fn involves(&self, party: PartyId) -> bool {
        self.interviewer_id == party || self.hr_id == party || self.candidate_id == party
    }

    pub fn occupies(&self, party: PartyId, scheduled_time: &str) -> bool {
        self.scheduled_time == scheduled_time && self.involves(party)
    }
}

/// Inbound create/reschedule payload. Missing fields decode as zero/empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewRequest {
    #[serde(default)]
    pub id: InterviewId,
    #[serde(default, alias = "interviewerId")]
    pub interviewer_id: PartyId,
    #[serde(default, alias = "candidateId")]
    pub candidate_id: PartyId,
    #[serde(default, alias = "hrId")]
    pub hr_id: PartyId,
    #[serde(default, alias = "scheduledTime")]
    pub scheduled_time: String,
    #[serde(default)]
    pub rescheduled: bool,
    #[serde(default, alias = "link")]
    pub interview_link: String,
}

impl InterviewRequest {
    pub fn missing_participant(&self) -> bool {
        self.interviewer_id.is_unset() || self.candidate_id.is_unset() || self.hr_id.is_unset()
    }

    pub fn into_interview(self, id: InterviewId) -> Interview {
        Interview {
            id,
            interviewer_id: self.interviewer_id,
            candidate_id: self.candidate_id,
            hr_id: self.hr_id,
            scheduled_time: self.scheduled_time,
            rescheduled: self.rescheduled,
            interview_link: self.interview_link,
        }
    }
}
