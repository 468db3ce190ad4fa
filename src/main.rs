use std::sync::Arc;

use anyhow::Context;

use mailpilot::config::AppConfig;
use mailpilot::llm::ollama::{OllamaGenerator, verify_models};
use mailpilot::llm::{DEFAULT_REPLY_TASK, ReplyGenerator};
use mailpilot::mail::{GmailClient, MailReader, MailWriter, load_access_token};
use mailpilot::pipeline::InboxPipeline;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    eprintln!("mailpilot v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.model);
    eprintln!("   Endpoint: {}", config.ollama_url);
    eprintln!("   Max messages: {}\n", config.max_results);

    // Advisory only — a missing model is warned about, never fatal here.
    verify_models(std::slice::from_ref(&config.model)).await;

    let token = load_access_token(&config.token_path).with_context(|| {
        format!(
            "no usable token at {} — run the authorization flow with {} first",
            config.token_path.display(),
            config.credentials_path.display(),
        )
    })?;

    let gmail = Arc::new(GmailClient::new(token));
    let reader: Arc<dyn MailReader> = gmail.clone();
    let writer: Arc<dyn MailWriter> = gmail;
    let generator: Arc<dyn ReplyGenerator> =
        Arc::new(OllamaGenerator::new(
            config.ollama_url.as_str(),
            config.model.as_str(),
        ));

    let pipeline = InboxPipeline::new(reader, writer, generator);
    let summary = pipeline
        .run(DEFAULT_REPLY_TASK, config.max_results)
        .await
        .context("inbox run failed")?;

    eprintln!(
        "\nDone: {} draft(s) created, {} message(s) failed",
        summary.processed, summary.failed
    );

    Ok(())
}
