//! End-to-end pipeline tests against in-memory mail and generator fakes.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mail_parser::MessageParser;

use mailpilot::error::{LlmError, MailError};
use mailpilot::llm::ReplyGenerator;
use mailpilot::mail::{FullMessage, MailReader, MailWriter, MessageRef};
use mailpilot::pipeline::InboxPipeline;

// ── Fakes ───────────────────────────────────────────────────────────

/// One canned inbox message: full-form JSON headers plus raw bytes.
#[derive(Clone)]
struct CannedMessage {
    id: String,
    full_json: String,
    raw: Vec<u8>,
}

fn canned(id: &str, from: &str, subject: &str, body: &str) -> CannedMessage {
    CannedMessage {
        id: id.to_string(),
        full_json: format!(
            r#"{{"id": "{id}",
                 "payload": {{"headers": [
                     {{"name": "From", "value": "{from}"}},
                     {{"name": "Subject", "value": "{subject}"}}
                 ]}}}}"#
        ),
        raw: format!(
            "From: {from}\r\nSubject: {subject}\r\nContent-Type: text/plain\r\n\r\n{body}\r\n"
        )
        .into_bytes(),
    }
}

#[derive(Default)]
struct FakeMailbox {
    messages: Vec<CannedMessage>,
    fetched_full: Mutex<Vec<String>>,
    fetched_raw: Mutex<Vec<String>>,
    drafts: Mutex<Vec<Vec<u8>>>,
    fail_raw_for: Option<String>,
}

impl FakeMailbox {
    fn with_messages(messages: Vec<CannedMessage>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    fn find(&self, id: &str) -> Result<&CannedMessage, MailError> {
        self.messages
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| MailError::Api {
                op: "fetch".into(),
                status: 404,
                body: format!("no message {id}"),
            })
    }
}

#[async_trait]
impl MailReader for FakeMailbox {
    async fn list_inbox(&self, max_results: u32) -> Result<Vec<MessageRef>, MailError> {
        Ok(self
            .messages
            .iter()
            .take(max_results as usize)
            .map(|m| MessageRef {
                id: m.id.clone(),
                thread_id: format!("thread-{}", m.id),
            })
            .collect())
    }

    async fn fetch_full(&self, id: &str) -> Result<FullMessage, MailError> {
        self.fetched_full.lock().unwrap().push(id.to_string());
        let msg = self.find(id)?;
        serde_json::from_str(&msg.full_json)
            .map_err(|e| MailError::Decode(e.to_string()))
    }

    async fn fetch_raw(&self, id: &str) -> Result<Vec<u8>, MailError> {
        self.fetched_raw.lock().unwrap().push(id.to_string());
        if self.fail_raw_for.as_deref() == Some(id) {
            return Err(MailError::Http {
                op: "fetch_raw".into(),
                reason: "connection reset".into(),
            });
        }
        Ok(self.find(id)?.raw.clone())
    }
}

#[async_trait]
impl MailWriter for FakeMailbox {
    async fn create_draft(&self, raw_message: &[u8]) -> Result<String, MailError> {
        let mut drafts = self.drafts.lock().unwrap();
        drafts.push(raw_message.to_vec());
        Ok(format!("draft-{}", drafts.len()))
    }
}

struct FakeGenerator {
    calls: Mutex<Vec<String>>,
    reply: String,
}

impl FakeGenerator {
    fn replying(reply: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: reply.to_string(),
        }
    }
}

#[async_trait]
impl ReplyGenerator for FakeGenerator {
    async fn generate(&self, email_text: &str, _task: &str) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(email_text.to_string());
        Ok(self.reply.clone())
    }
}

fn pipeline_for(
    mailbox: Arc<FakeMailbox>,
    generator: Arc<FakeGenerator>,
) -> InboxPipeline {
    InboxPipeline::new(mailbox.clone(), mailbox, generator)
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_inbox_makes_no_generation_or_draft_calls() {
    let mailbox = Arc::new(FakeMailbox::with_messages(vec![]));
    let generator = Arc::new(FakeGenerator::replying("hi"));
    let pipeline = pipeline_for(mailbox.clone(), generator.clone());

    let summary = pipeline.run("reply task", 5).await.unwrap();

    assert_eq!(summary.processed, 0);
    assert_eq!(summary.failed, 0);
    assert!(summary.draft_ids.is_empty());
    assert!(generator.calls.lock().unwrap().is_empty());
    assert!(mailbox.drafts.lock().unwrap().is_empty());
    assert!(mailbox.fetched_full.lock().unwrap().is_empty());
}

#[tokio::test]
async fn two_messages_processed_in_listing_order() {
    let mailbox = Arc::new(FakeMailbox::with_messages(vec![
        canned("m1", "alice@example.com", "Hello", "Are we still on for Friday?"),
        canned("m2", "bob@example.com", "Invoice", "Please find the invoice attached."),
    ]));
    let generator = Arc::new(FakeGenerator::replying("Sounds good!"));
    let pipeline = pipeline_for(mailbox.clone(), generator.clone());

    let summary = pipeline.run("reply task", 5).await.unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.draft_ids, vec!["draft-1", "draft-2"]);

    // Exactly two fetch cycles, in listing order
    assert_eq!(*mailbox.fetched_full.lock().unwrap(), vec!["m1", "m2"]);
    assert_eq!(*mailbox.fetched_raw.lock().unwrap(), vec!["m1", "m2"]);

    // Exactly two generation calls, fed with the extracted bodies
    let calls = generator.calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], "Are we still on for Friday?");
    assert_eq!(calls[1], "Please find the invoice attached.");

    // Exactly two draft submissions
    assert_eq!(mailbox.drafts.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn drafts_are_addressed_replies() {
    let mailbox = Arc::new(FakeMailbox::with_messages(vec![canned(
        "m1",
        "alice@example.com",
        "Hello",
        "Quick question for you.",
    )]));
    let generator = Arc::new(FakeGenerator::replying("Here is my answer."));
    let pipeline = pipeline_for(mailbox.clone(), generator);

    pipeline.run("reply task", 5).await.unwrap();

    let drafts = mailbox.drafts.lock().unwrap();
    assert_eq!(drafts.len(), 1);

    let parsed = MessageParser::default().parse(&drafts[0]).unwrap();
    assert_eq!(parsed.subject(), Some("Re: Hello"));
    assert_eq!(
        parsed.to().and_then(|t| t.first()).and_then(|a| a.address()),
        Some("alice@example.com")
    );
    assert_eq!(
        parsed.body_text(0).as_deref().map(str::trim),
        Some("Here is my answer.")
    );
}

#[tokio::test]
async fn listing_respects_max_messages() {
    let mailbox = Arc::new(FakeMailbox::with_messages(vec![
        canned("m1", "a@example.com", "one", "first"),
        canned("m2", "b@example.com", "two", "second"),
        canned("m3", "c@example.com", "three", "third"),
    ]));
    let generator = Arc::new(FakeGenerator::replying("ok"));
    let pipeline = pipeline_for(mailbox.clone(), generator);

    let summary = pipeline.run("reply task", 2).await.unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(mailbox.drafts.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn one_failing_message_does_not_stop_the_run() {
    let mut mailbox = FakeMailbox::with_messages(vec![
        canned("m1", "a@example.com", "one", "first"),
        canned("m2", "b@example.com", "two", "second"),
        canned("m3", "c@example.com", "three", "third"),
    ]);
    mailbox.fail_raw_for = Some("m2".to_string());
    let mailbox = Arc::new(mailbox);
    let generator = Arc::new(FakeGenerator::replying("ok"));
    let pipeline = pipeline_for(mailbox.clone(), generator.clone());

    let summary = pipeline.run("reply task", 5).await.unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.draft_ids, vec!["draft-1", "draft-2"]);

    // m2's raw fetch failed, so generation only ran for m1 and m3
    let calls = generator.calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], "first");
    assert_eq!(calls[1], "third");
}

#[tokio::test]
async fn unreadable_body_still_gets_a_draft() {
    // A message with only an attachment part: the extractor falls back to
    // its sentinel, which is what gets sent to the generator.
    let attachment_only = CannedMessage {
        id: "m1".to_string(),
        full_json: r#"{"id": "m1",
            "payload": {"headers": [
                {"name": "From", "value": "carol@example.com"},
                {"name": "Subject", "value": "Report"}
            ]}}"#
            .to_string(),
        raw: b"From: carol@example.com\r\n\
               Subject: Report\r\n\
               Content-Type: multipart/mixed; boundary=\"B\"\r\n\r\n\
               --B\r\n\
               Content-Type: application/pdf\r\n\
               Content-Disposition: attachment; filename=\"q3.pdf\"\r\n\r\n\
               %PDF-1.4\r\n\
               --B--\r\n"
            .to_vec(),
    };

    let mailbox = Arc::new(FakeMailbox::with_messages(vec![attachment_only]));
    let generator = Arc::new(FakeGenerator::replying("Noted."));
    let pipeline = pipeline_for(mailbox.clone(), generator.clone());

    let summary = pipeline.run("reply task", 5).await.unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(
        generator.calls.lock().unwrap()[0],
        "(no readable text content found)"
    );
}
