//! Configuration loaded from the environment.

use secrecy::SecretString;

use crate::error::ConfigError;

/// Bot configuration.
///
/// Tokens and the signing secret are wrapped in [`SecretString`] so they
/// never appear in debug output or logs.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Bot OAuth token (`xoxb-…`), used as bearer auth on Web API calls.
    pub bot_token: SecretString,
    /// Signing secret used to verify inbound event requests.
    pub signing_secret: SecretString,
    /// Port the events server binds on.
    pub port: u16,
    /// Channel the startup messages are scheduled into. Scheduling is
    /// skipped entirely when unset.
    pub schedule_channel: Option<String>,
}

impl BotConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token = require_env("SLACK_BOT_TOKEN")?;
        let signing_secret = require_env("SLACK_SIGNING_SECRET")?;

        let port = match std::env::var("WELCOME_BOT_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "WELCOME_BOT_PORT".to_string(),
                message: format!("not a valid port number: {raw}"),
            })?,
            Err(_) => 3000,
        };

        let schedule_channel = std::env::var("WELCOME_BOT_SCHEDULE_CHANNEL")
            .ok()
            .filter(|c| !c.trim().is_empty());

        Ok(Self {
            bot_token: SecretString::from(bot_token),
            signing_secret: SecretString::from(signing_secret),
            port,
            schedule_channel,
        })
    }
}

fn require_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}
