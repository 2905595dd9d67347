use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

/// Random bytes drawn per link, and characters kept after encoding.
pub const LINK_LENGTH: usize = 20;
pub const LINK_SCHEME: &str = "https://";

#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("secure random source unavailable: {0}")]
    RandomSource(String),
}

/// Source of opaque interview join links.
pub trait LinkGenerator: Send + Sync {
    fn generate(&self) -> Result<String, LinkError>;
}

/// Link generator backed by the operating system CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct SecureLinkGenerator;

impl LinkGenerator for SecureLinkGenerator {
    fn generate(&self) -> Result<String, LinkError> {
        generate_link()
    }
}

/// `https://` followed by 20 URL-safe base64 characters. Uniqueness is not checked.
pub fn generate_link() -> Result<String, LinkError> {
    let mut bytes = [0u8; LINK_LENGTH];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|err| LinkError::RandomSource(err.to_string()))?;

    let mut token = URL_SAFE_NO_PAD.encode(bytes);
    token.truncate(LINK_LENGTH);
    Ok(format!("{LINK_SCHEME}{token}"))
}
