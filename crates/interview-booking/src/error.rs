use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::interviews::InterviewServiceError;
use crate::workflows::notifications::BrokerError;
use crate::workflows::parties::PartyServiceError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;
use tracing::error;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Broker(BrokerError),
    InvalidBody(String),
    Interview(InterviewServiceError),
    Party(PartyServiceError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Interview(err) => match err {
                InterviewServiceError::MissingParticipant
                | InterviewServiceError::InvalidId(_)
                | InterviewServiceError::Conflict { .. } => StatusCode::BAD_REQUEST,
                InterviewServiceError::PartyNotFound { .. }
                | InterviewServiceError::InterviewNotFound(_) => StatusCode::NOT_FOUND,
                InterviewServiceError::DuplicateInterview(_)
                | InterviewServiceError::IdsExhausted(_) => StatusCode::CONFLICT,
                InterviewServiceError::Repository(_)
                | InterviewServiceError::Publish(_)
                | InterviewServiceError::Link(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Party(err) => match err {
                PartyServiceError::InvalidPhone(_)
                | PartyServiceError::InvalidId { .. }
                | PartyServiceError::PhoneTaken { .. } => StatusCode::BAD_REQUEST,
                PartyServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
                PartyServiceError::DuplicateId { .. } | PartyServiceError::IdsExhausted { .. } => {
                    StatusCode::CONFLICT
                }
                PartyServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) | AppError::Broker(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Broker(err) => write!(f, "broker error: {}", err),
            AppError::InvalidBody(reason) => write!(f, "invalid request body: {}", reason),
            AppError::Interview(err) => write!(f, "{}", err),
            AppError::Party(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Broker(err) => Some(err),
            AppError::InvalidBody(_) => None,
            AppError::Interview(err) => Some(err),
            AppError::Party(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<BrokerError> for AppError {
    fn from(value: BrokerError) -> Self {
        Self::Broker(value)
    }
}

impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        Self::InvalidBody(value.body_text())
    }
}

impl From<InterviewServiceError> for AppError {
    fn from(value: InterviewServiceError) -> Self {
        Self::Interview(value)
    }
}

impl From<PartyServiceError> for AppError {
    fn from(value: PartyServiceError) -> Self {
        Self::Party(value)
    }
}
