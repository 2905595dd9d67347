use async_trait::async_trait;
use tracing::info;

use crate::config::TwilioConfig;

/// Terminal SMS transport.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    async fn send(&self, from: &str, to: &str, body: &str) -> Result<(), SmsError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    #[error("sms transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("sms provider rejected message with status {status}: {detail}")]
    Rejected { status: u16, detail: String },
    #[error("sms gateway unavailable: {0}")]
    Unavailable(String),
}

/// Twilio Programmable Messaging over its REST API.
#[derive(Debug, Clone)]
pub struct TwilioSmsGateway {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
    api_base: String,
}

impl TwilioSmsGateway {
    pub fn new(config: &TwilioConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &TwilioConfig) -> Self {
        Self {
            client,
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base, self.account_sid
        )
    }
}

#[async_trait]
impl SmsGateway for TwilioSmsGateway {
    async fn send(&self, from: &str, to: &str, body: &str) -> Result<(), SmsError> {
        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("From", from), ("To", to), ("Body", body)])
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let detail = response.text().await.unwrap_or_default();
        Err(SmsError::Rejected {
            status: status.as_u16(),
            detail,
        })
    }
}

/// Gateway that only records the message in the log. Used when no provider is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSmsGateway;

#[async_trait]
impl SmsGateway for LogSmsGateway {
    async fn send(&self, from: &str, to: &str, body: &str) -> Result<(), SmsError> {
        info!(from, to, body, "sms provider not configured; message logged only");
        Ok(())
    }
}
