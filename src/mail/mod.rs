//! Mail provider access.
//!
//! The pipeline depends on two narrow capability traits, [`MailReader`]
//! and [`MailWriter`], so it can be exercised with fakes. The live
//! implementation of both is [`gmail::GmailClient`].

pub mod gmail;
pub mod token;

pub use gmail::GmailClient;
pub use token::load_access_token;

use async_trait::async_trait;
use base64::alphabet;
use base64::engine::general_purpose::GeneralPurposeConfig;
use base64::engine::{DecodePaddingMode, GeneralPurpose};
use serde::Deserialize;

use crate::error::MailError;

/// URL-safe base64, padding-indifferent on decode. Gmail uses base64url
/// for raw message payloads in both directions.
pub(crate) const BASE64_URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

// ── Wire types (Gmail API shapes) ───────────────────────────────────

/// Opaque reference to a mailbox item, as returned by a listing call.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MessageRef {
    pub id: String,
    #[serde(rename = "threadId")]
    pub thread_id: String,
}

/// A single message header as the provider reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageHeader {
    pub name: String,
    pub value: String,
}

/// Structured payload of a `format=full` fetch. Only the header list is
/// needed downstream.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagePayload {
    pub headers: Option<Vec<MessageHeader>>,
}

/// A message fetched in `format=full`.
#[derive(Debug, Clone, Deserialize)]
pub struct FullMessage {
    pub id: String,
    pub payload: Option<MessagePayload>,
}

impl FullMessage {
    /// Header list, empty when the provider omitted the payload.
    pub fn headers(&self) -> &[MessageHeader] {
        self.payload
            .as_ref()
            .and_then(|p| p.headers.as_deref())
            .unwrap_or_default()
    }
}

// ── Capability traits ───────────────────────────────────────────────

/// Read access to a mailbox.
#[async_trait]
pub trait MailReader: Send + Sync {
    /// List up to `max_results` message references from the inbox,
    /// provider ordering (most recent first for Gmail).
    async fn list_inbox(&self, max_results: u32) -> Result<Vec<MessageRef>, MailError>;

    /// Fetch a message in full form (headers + structured payload).
    async fn fetch_full(&self, id: &str) -> Result<FullMessage, MailError>;

    /// Fetch the transport-encoded bytes of a message.
    async fn fetch_raw(&self, id: &str) -> Result<Vec<u8>, MailError>;
}

/// Write access to a mailbox.
#[async_trait]
pub trait MailWriter: Send + Sync {
    /// Submit transport-encoded message bytes as a draft; returns the
    /// provider-assigned draft id.
    async fn create_draft(&self, raw_message: &[u8]) -> Result<String, MailError>;
}
