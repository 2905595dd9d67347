use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub notifications: NotificationConfig,
    pub sms: SmsConfig,
    pub parties: PartyConfig,
}

impl AppConfig {
    /// Load configuration from the process environment, reading `.env` first when present.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let environment = AppEnvironment::from_str(&var("APP_ENV", "development"));

        let host = var("APP_HOST", "127.0.0.1");
        let port = var("APP_PORT", "8000")
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = var("APP_LOG_LEVEL", "info");
        let format = LogFormat::from_str(&var("APP_LOG_FORMAT", "compact"));

        let notifications = NotificationConfig {
            topic: var("NOTIFY_TOPIC", "notification_topic"),
            subscription: var("NOTIFY_SUBSCRIPTION", "notification_subscription"),
        };

        let country_code = var("PHONE_COUNTRY_CODE", "91");
        if country_code.is_empty() || !country_code.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidCountryCode(country_code));
        }

        let twilio = match (
            lookup("TWILIO_ACCOUNT_SID"),
            lookup("TWILIO_AUTH_TOKEN"),
            lookup("TWILIO_FROM_NUMBER"),
        ) {
            (Some(account_sid), Some(auth_token), Some(from_number)) => Some(TwilioConfig {
                account_sid,
                auth_token,
                from_number,
                api_base: var("TWILIO_API_BASE", "https://api.twilio.com"),
            }),
            (None, None, None) => None,
            _ => return Err(ConfigError::IncompleteTwilio),
        };

        let sms = SmsConfig {
            fallback_from_number: var("SMS_FROM_NUMBER", "+10000000000"),
            twilio,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, format },
            notifications,
            sms,
            parties: PartyConfig { country_code },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

/// Line format emitted by the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn from_str(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Compact
        }
    }
}

/// Topic and subscription the notification pipeline is wired to.
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub topic: String,
    pub subscription: String,
}

/// Outbound SMS settings. Without Twilio credentials messages are only logged.
#[derive(Debug, Clone)]
pub struct SmsConfig {
    pub fallback_from_number: String,
    pub twilio: Option<TwilioConfig>,
}

impl SmsConfig {
    /// Sender number stamped on every outbound message.
    pub fn from_number(&self) -> &str {
        match &self.twilio {
            Some(twilio) => &twilio.from_number,
            None => &self.fallback_from_number,
        }
    }
}

#[derive(Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    pub api_base: String,
}

impl fmt::Debug for TwilioConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwilioConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("from_number", &self.from_number)
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Party registration rules.
#[derive(Debug, Clone)]
pub struct PartyConfig {
    /// Digits expected between `+` and the 10-digit subscriber number.
    pub country_code: String,
}

impl Default for PartyConfig {
    fn default() -> Self {
        Self {
            country_code: "91".to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidCountryCode(String),
    IncompleteTwilio,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidCountryCode(value) => {
                write!(f, "PHONE_COUNTRY_CODE must be digits only, got '{value}'")
            }
            ConfigError::IncompleteTwilio => write!(
                f,
                "TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN and TWILIO_FROM_NUMBER must be set together"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidCountryCode(_)
            | ConfigError::IncompleteTwilio => None,
        }
    }
}
