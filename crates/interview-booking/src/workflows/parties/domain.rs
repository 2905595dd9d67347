use std::fmt;

use serde::{Deserialize, Serialize};

/// Role a party plays in an interview. Each role has its own id space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyRole {
    Interviewer,
    Candidate,
    Hr,
}

impl PartyRole {
    pub const ALL: [PartyRole; 3] = [Self::Interviewer, Self::Candidate, Self::Hr];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Interviewer => "Interviewer",
            Self::Candidate => "Candidate",
            Self::Hr => "HR",
        }
    }

    /// Singular path segment used by the registry routes (`/hr/{id}`).
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Interviewer => "interviewer",
            Self::Candidate => "candidate",
            Self::Hr => "hr",
        }
    }

    /// Plural path segment used by the listing routes (`/hrs`).
    pub fn collection_segment(&self) -> &'static str {
        match self {
            Self::Interviewer => "interviewers",
            Self::Candidate => "candidates",
            Self::Hr => "hrs",
        }
    }
}

impl fmt::Display for PartyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifier of a party within its role. Zero means unset.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PartyId(pub i64);

impl PartyId {
    pub fn is_unset(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Interviewer, candidate, or HR contact record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    #[serde(default)]
    pub id: PartyId,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "phone")]
    pub phone_number: String,
}

/// Number of subscriber digits expected after the country code.
pub const SUBSCRIBER_DIGITS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "Invalid phone number format. Phone number should start with '+{country_code}' and have 10 additional digits."
)]
pub struct PhoneNumberError {
    pub country_code: String,
    pub phone_number: String,
}

/// Check `phone` against `+<country_code><10 digits>`.
pub fn validate_phone_number(phone: &str, country_code: &str) -> Result<(), PhoneNumberError> {
    let invalid = || PhoneNumberError {
        country_code: country_code.to_string(),
        phone_number: phone.to_string(),
    };

    let subscriber = phone
        .strip_prefix('+')
        .and_then(|rest| rest.strip_prefix(country_code))
        .ok_or_else(invalid)?;

    if subscriber.len() == SUBSCRIBER_DIGITS && subscriber.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(invalid())
    }
}
