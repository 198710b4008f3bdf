//! Error types for Welcome Bot.

/// Top-level error type for the bot.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Slack Web API errors.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Slack API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Slack API {method} returned an error: {code}")]
    Api { method: String, code: String },

    #[error("Slack API {method} response missing field: {field}")]
    MalformedResponse { method: String, field: String },
}

impl GatewayError {
    /// Error for a response that is well-formed JSON but lacks an expected field.
    pub fn missing_field(method: &str, field: &str) -> Self {
        Self::MalformedResponse {
            method: method.to_string(),
            field: field.to_string(),
        }
    }
}

/// Result type alias for the bot.
pub type Result<T> = std::result::Result<T, Error>;
