//! Body extraction — raw RFC 822 bytes to best-effort plain text.
//!
//! Walks every MIME part, skipping attachments, and prefers `text/plain`
//! parts over `text/html`. HTML is only used as a fallback, with tags
//! stripped to newline-separated visible text.

use std::sync::LazyLock;

use mail_parser::{Message, MessageParser, MimeHeaders, PartType};
use regex::Regex;

/// Sentinel returned when a message carries no readable text at all.
pub const NO_READABLE_TEXT: &str = "(no readable text content found)";

static BLANK_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Extract readable text from a raw RFC 822 message.
///
/// Preference order: joined `text/plain` parts, then joined `text/html`
/// parts with markup stripped, then the [`NO_READABLE_TEXT`] sentinel.
/// Parts whose disposition marks them as attachments never contribute,
/// regardless of content type.
pub fn extract_body(raw: &[u8]) -> String {
    let Some(message) = MessageParser::default().parse(raw) else {
        return NO_READABLE_TEXT.to_string();
    };

    let mut plain_parts: Vec<String> = Vec::new();
    let mut html_parts: Vec<String> = Vec::new();
    collect_text_parts(&message, &mut plain_parts, &mut html_parts);

    if !plain_parts.is_empty() {
        let combined = plain_parts.join("\n").trim().to_string();
        if !combined.is_empty() {
            return combined;
        }
    }

    if !html_parts.is_empty() {
        let text = strip_html(&html_parts.join("\n"));
        let cleaned = BLANK_RUNS.replace_all(&text, "\n\n").trim().to_string();
        if !cleaned.is_empty() {
            return cleaned;
        }
    }

    NO_READABLE_TEXT.to_string()
}

/// Walk every part of a message, recursing into nested `message/rfc822`
/// parts, and collect decoded plain and HTML bodies in document order.
fn collect_text_parts(message: &Message, plain: &mut Vec<String>, html: &mut Vec<String>) {
    for part in &message.parts {
        if is_attachment(part) {
            continue;
        }
        match &part.body {
            PartType::Text(text) => plain.push(text.to_string()),
            PartType::Html(text) => html.push(text.to_string()),
            PartType::Message(nested) => collect_text_parts(nested, plain, html),
            // Binary parts include anything mail-parser could not decode as
            // text; they contribute nothing.
            _ => {}
        }
    }
}

fn is_attachment(part: &mail_parser::MessagePart) -> bool {
    part.content_disposition()
        .is_some_and(|cd| cd.ctype().eq_ignore_ascii_case("attachment"))
}

/// Strip markup tags, emitting a newline at each tag boundary so block
/// structure survives as line breaks. Runs of blank lines are collapsed
/// by the caller.
pub fn strip_html(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                if !result.is_empty() && !result.ends_with('\n') {
                    result.push('\n');
                }
            }
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }
    result
}
