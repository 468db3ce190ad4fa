//! Configuration types.

use std::path::PathBuf;

use crate::error::ConfigError;

/// OAuth scopes the stored token must carry for a full pipeline run
/// (read the inbox, compose drafts).
pub const GMAIL_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/gmail.readonly",
    "https://www.googleapis.com/auth/gmail.compose",
    "https://www.googleapis.com/auth/gmail.modify",
];

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to the stored OAuth token file (written by the external auth flow).
    pub token_path: PathBuf,
    /// Path to the OAuth client secrets file (consumed by the external auth flow).
    pub credentials_path: PathBuf,
    /// Ollama model used to draft replies.
    pub model: String,
    /// Ollama generation endpoint.
    pub ollama_url: String,
    /// OAuth scopes the token is expected to cover.
    pub scopes: Vec<String>,
    /// Maximum number of inbox messages to process per run.
    pub max_results: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            token_path: PathBuf::from("token.json"),
            credentials_path: PathBuf::from("credentials.json"),
            model: "qwen2.5:14b".to_string(),
            ollama_url: "http://localhost:11434/api/generate".to_string(),
            scopes: GMAIL_SCOPES.iter().map(|s| s.to_string()).collect(),
            max_results: 5,
        }
    }
}

impl AppConfig {
    /// Build config from `MAILPILOT_*` environment variables, falling back
    /// to defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            token_path: std::env::var("MAILPILOT_TOKEN_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.token_path),
            credentials_path: std::env::var("MAILPILOT_CREDENTIALS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.credentials_path),
            model: std::env::var("MAILPILOT_MODEL").unwrap_or(defaults.model),
            ollama_url: std::env::var("MAILPILOT_OLLAMA_URL").unwrap_or(defaults.ollama_url),
            scopes: defaults.scopes,
            max_results: parse_max_results(
                std::env::var("MAILPILOT_MAX_RESULTS").ok(),
                defaults.max_results,
            )?,
        })
    }
}

fn parse_max_results(raw: Option<String>, default: u32) -> Result<u32, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|e| ConfigError::InvalidValue {
            key: "MAILPILOT_MAX_RESULTS".to_string(),
            message: format!("{value:?}: {e}"),
        }),
    }
}
