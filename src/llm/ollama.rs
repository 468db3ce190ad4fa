//! Ollama client — one non-streamed `/api/generate` call per reply, plus
//! an advisory check that the configured model is actually installed.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::llm::{ReplyGenerator, build_reply_prompt};

// ── Wire types ──────────────────────────────────────────────────────

#[derive(Serialize)]
struct GenRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[derive(Deserialize)]
struct GenResponse {
    response: Option<String>,
}

// ── Generator ───────────────────────────────────────────────────────

/// Reply generator backed by a locally hosted Ollama endpoint.
pub struct OllamaGenerator {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaGenerator {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ReplyGenerator for OllamaGenerator {
    async fn generate(&self, email_text: &str, task: &str) -> Result<String, LlmError> {
        let request = GenRequest {
            model: &self.model,
            prompt: build_reply_prompt(email_text, task),
            stream: false,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed {
                reason: format!("POST {} failed: {e}", self.endpoint),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::RequestFailed {
                reason: format!("generation service returned {status}: {body}"),
            });
        }

        let parsed: GenResponse = response.json().await.map_err(|e| LlmError::InvalidResponse {
            reason: format!("failed to parse generation response: {e}"),
        })?;

        Ok(parsed.response.unwrap_or_default().trim().to_string())
    }
}

// ── Model availability (advisory) ───────────────────────────────────

/// Query installed model names via `ollama list`. Any failure yields an
/// empty set — this check must never block the pipeline.
pub async fn installed_models() -> HashSet<String> {
    let output = match tokio::process::Command::new("ollama")
        .arg("list")
        .output()
        .await
    {
        Ok(out) if out.status.success() => out,
        _ => return HashSet::new(),
    };

    parse_installed_output(&String::from_utf8_lossy(&output.stdout))
}

/// Parse `ollama list` output into base model names (text before the
/// first `:` on each line, so `llama3.1:8b ...` counts as `llama3.1`).
pub fn parse_installed_output(stdout: &str) -> HashSet<String> {
    stdout
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(base, _)| base.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Required models not present in the installed set. Tags are stripped
/// before comparison, so `llama3.1:8b` counts if `llama3.1` is installed.
pub fn missing_models(installed: &HashSet<String>, required: &[String]) -> Vec<String> {
    required
        .iter()
        .filter(|model| {
            let base = model.split(':').next().unwrap_or(model);
            !installed.contains(base)
        })
        .cloned()
        .collect()
}

/// Warn about required models that are not installed. Purely advisory.
pub async fn verify_models(required: &[String]) {
    let installed = installed_models().await;
    let missing = missing_models(&installed, required);

    for model in &missing {
        tracing::warn!(
            model = %model,
            "Ollama model not installed — install with: ollama pull {model}"
        );
    }
}
