//! Inbox pipeline — list recent messages, draft a reply for each, and
//! store the drafts back into the mailbox.
//!
//! Flow per run: list → (fetch full + raw → extract → generate →
//! compose/submit)* → summary. Messages are processed strictly one at a
//! time. A failure on one message is logged and counted but does not
//! stop the run; only a listing failure aborts.

use std::sync::Arc;

use tracing::{error, info};

use crate::draft::compose_and_submit;
use crate::error::{Error, Result};
use crate::extract::extract_body;
use crate::llm::ReplyGenerator;
use crate::mail::{MailReader, MailWriter, MessageRef};

/// Body preview length in the per-message progress log.
const PREVIEW_CHARS: usize = 500;

/// Outcome of a single pipeline run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Messages that made it all the way to a stored draft.
    pub processed: usize,
    /// Messages skipped because a step failed.
    pub failed: usize,
    /// Draft ids created, in listing order.
    pub draft_ids: Vec<String>,
}

/// Single-pass inbox-to-drafts pipeline.
pub struct InboxPipeline {
    reader: Arc<dyn MailReader>,
    writer: Arc<dyn MailWriter>,
    generator: Arc<dyn ReplyGenerator>,
}

impl InboxPipeline {
    pub fn new(
        reader: Arc<dyn MailReader>,
        writer: Arc<dyn MailWriter>,
        generator: Arc<dyn ReplyGenerator>,
    ) -> Self {
        Self {
            reader,
            writer,
            generator,
        }
    }

    /// Run one pass over the inbox: up to `max_messages` messages, a
    /// reply draft for each.
    pub async fn run(&self, task: &str, max_messages: u32) -> Result<RunSummary> {
        let refs = self
            .reader
            .list_inbox(max_messages)
            .await
            .map_err(Error::Mail)?;

        if refs.is_empty() {
            info!("Inbox empty — nothing to draft");
            return Ok(RunSummary::default());
        }

        info!(count = refs.len(), "Drafting replies for inbox messages");

        let mut summary = RunSummary::default();
        for msg_ref in &refs {
            match self.process_message(msg_ref, task).await {
                Ok(draft_id) => {
                    summary.processed += 1;
                    summary.draft_ids.push(draft_id);
                }
                Err(e) => {
                    error!(id = %msg_ref.id, error = %e, "Failed to draft reply for message");
                    summary.failed += 1;
                }
            }
        }

        info!(
            processed = summary.processed,
            failed = summary.failed,
            "Inbox run complete"
        );
        Ok(summary)
    }

    /// Fetch → extract → generate → compose/submit for one message.
    async fn process_message(&self, msg_ref: &MessageRef, task: &str) -> Result<String> {
        let full = self.reader.fetch_full(&msg_ref.id).await?;
        let raw = self.reader.fetch_raw(&msg_ref.id).await?;

        let body = extract_body(&raw);
        info!(id = %msg_ref.id, body = %preview(&body), "Extracted message body");

        let reply = self.generator.generate(&body, task).await?;
        info!(id = %msg_ref.id, reply = %reply, "Generated reply");

        let draft_id = compose_and_submit(self.writer.as_ref(), full.headers(), &reply).await?;
        info!(id = %msg_ref.id, draft_id = %draft_id, "Draft created");

        Ok(draft_id)
    }
}

/// Truncate text to [`PREVIEW_CHARS`] characters, appending `...` when
/// anything was cut.
fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        out.push_str("...");
    }
    out
}
