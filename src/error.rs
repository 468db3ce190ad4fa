//! Error types for mailpilot.

/// Top-level error type for the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Mail provider errors (Gmail REST access and message composition).
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Failed to load stored token from {path}: {reason}")]
    TokenLoad { path: String, reason: String },

    #[error("Mail API request failed during {op}: {reason}")]
    Http { op: String, reason: String },

    #[error("Mail API returned {status} during {op}: {body}")]
    Api {
        op: String,
        status: u16,
        body: String,
    },

    #[error("Failed to decode message payload: {0}")]
    Decode(String),

    #[error("Failed to compose outgoing message: {0}")]
    Compose(String),
}

/// Text-generation service errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Generation request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("Invalid response from generation service: {reason}")]
    InvalidResponse { reason: String },
}

/// Result type alias for the pipeline.
pub type Result<T> = std::result::Result<T, Error>;
