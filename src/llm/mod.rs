//! Reply generation.
//!
//! The pipeline talks to the text-generation service through the
//! [`ReplyGenerator`] trait so tests can substitute fakes. The only live
//! implementation is [`ollama::OllamaGenerator`].

pub mod ollama;

pub use ollama::OllamaGenerator;

use async_trait::async_trait;

use crate::error::LlmError;

/// Default instruction given to the model when drafting replies.
pub const DEFAULT_REPLY_TASK: &str = "\
You are generating an email reply on behalf of the user.

Rules:
1. Do not invent facts or pretend you know details not present.
2. If the email contains questions, answer them directly.
3. If the sender is making a request, acknowledge it and respond appropriately.
4. Keep the tone natural and human, not robotic.
5. Maintain a polite, concise style unless the original email is from a friend.
6. If the email is personal or emotional, respond with appropriate empathy.
7. If the email is business-related, be professional and crisp.
8. If the email is spam, write: \"This appears to be spam. No response needed.\"

Your output must be ONLY the full email reply text.";

/// Capability to draft a reply for an extracted email body.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// Generate a reply for `email_text` following `task`. Returns the
    /// generated text trimmed of surrounding whitespace.
    async fn generate(&self, email_text: &str, task: &str) -> Result<String, LlmError>;
}

/// Build the single prompt sent to the generation service.
pub fn build_reply_prompt(email_text: &str, task: &str) -> String {
    format!("USER_EMAIL:\n{email_text}\n\nTASK:\n{task}\n")
}
