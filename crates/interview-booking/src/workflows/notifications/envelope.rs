use serde::{Deserialize, Serialize};

/// Outbound SMS unit carried through the broker. Wire names follow the topic contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "phone_number")]
    pub target_phone: String,
    #[serde(rename = "message")]
    pub body: String,
}

impl Envelope {
    pub fn new(target_phone: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            target_phone: target_phone.into(),
            body: body.into(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_bytes(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }
}
