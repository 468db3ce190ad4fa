//! Draft composition — builds the outgoing reply from the original
//! message's headers and submits it through the mail-write capability.

use mail_builder::MessageBuilder;
use mail_builder::headers::raw::Raw;

use crate::error::MailError;
use crate::mail::{MailWriter, MessageHeader};

/// Placeholder when the original message has no Subject header.
pub const NO_SUBJECT: &str = "(no subject)";

/// Reply-relevant values pulled from the original message's headers.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReplyHeaders {
    pub sender: Option<String>,
    pub subject: Option<String>,
}

/// Locate `Subject` and `From` by exact name match. The scan overwrites
/// on each match, so with duplicate headers the last one seen wins.
pub fn reply_headers(headers: &[MessageHeader]) -> ReplyHeaders {
    let mut found = ReplyHeaders::default();
    for header in headers {
        if header.name == "Subject" {
            found.subject = Some(header.value.clone());
        }
        if header.name == "From" {
            found.sender = Some(header.value.clone());
        }
    }
    found
}

/// Build the transport-encoded reply: `To` is the original sender
/// verbatim (empty when absent), subject is `Re: ` + the original
/// subject or the placeholder, body is the generated text.
pub fn compose_reply(headers: &[MessageHeader], reply_text: &str) -> Result<Vec<u8>, MailError> {
    let ReplyHeaders { sender, subject } = reply_headers(headers);

    let subject = format!("Re: {}", subject.unwrap_or_else(|| NO_SUBJECT.to_string()));

    MessageBuilder::new()
        .header("To", Raw::new(sender.unwrap_or_default()))
        .subject(subject)
        .text_body(reply_text.to_string())
        .write_to_vec()
        .map_err(|e| MailError::Compose(e.to_string()))
}

/// Compose the reply and submit it as a draft; returns the
/// provider-assigned draft id.
pub async fn compose_and_submit(
    writer: &dyn MailWriter,
    headers: &[MessageHeader],
    reply_text: &str,
) -> Result<String, MailError> {
    let raw = compose_reply(headers, reply_text)?;
    writer.create_draft(&raw).await
}
