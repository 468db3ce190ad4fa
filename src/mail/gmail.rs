//! Gmail REST client — implements the mail read/write capabilities over
//! the v1 API (`users/me/messages`, `users/me/drafts`).

use async_trait::async_trait;
use base64::Engine;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::MailError;
use crate::mail::{BASE64_URL, FullMessage, MailReader, MailWriter, MessageRef};

const GMAIL_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1/users/me";

#[derive(Deserialize)]
struct ListMessagesResponse {
    messages: Option<Vec<MessageRef>>,
}

#[derive(Deserialize)]
struct RawMessageResponse {
    raw: String,
}

#[derive(Deserialize)]
struct DraftResponse {
    id: String,
}

/// Authenticated Gmail API client.
pub struct GmailClient {
    client: reqwest::Client,
    token: SecretString,
    base_url: String,
}

impl GmailClient {
    pub fn new(token: SecretString) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            base_url: GMAIL_API_BASE.to_string(),
        }
    }

    /// Point the client at a different API base (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        op: &str,
        path_and_query: &str,
    ) -> Result<T, MailError> {
        let url = format!("{}{}", self.base_url, path_and_query);
        let response = self
            .client
            .get(&url)
            .bearer_auth(self.token.expose_secret())
            .send()
            .await
            .map_err(|e| MailError::Http {
                op: op.to_string(),
                reason: e.to_string(),
            })?;

        Self::parse_json(op, response).await
    }

    async fn parse_json<T: DeserializeOwned>(
        op: &str,
        response: reqwest::Response,
    ) -> Result<T, MailError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Api {
                op: op.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        response.json().await.map_err(|e| MailError::Http {
            op: op.to_string(),
            reason: format!("invalid response body: {e}"),
        })
    }
}

#[async_trait]
impl MailReader for GmailClient {
    async fn list_inbox(&self, max_results: u32) -> Result<Vec<MessageRef>, MailError> {
        let list: ListMessagesResponse = self
            .get_json(
                "list",
                &format!("/messages?labelIds=INBOX&maxResults={max_results}"),
            )
            .await?;
        Ok(list.messages.unwrap_or_default())
    }

    async fn fetch_full(&self, id: &str) -> Result<FullMessage, MailError> {
        self.get_json("fetch_full", &format!("/messages/{id}?format=full"))
            .await
    }

    async fn fetch_raw(&self, id: &str) -> Result<Vec<u8>, MailError> {
        let msg: RawMessageResponse = self
            .get_json("fetch_raw", &format!("/messages/{id}?format=raw"))
            .await?;

        BASE64_URL
            .decode(msg.raw.as_bytes())
            .map_err(|e| MailError::Decode(format!("raw payload is not valid base64url: {e}")))
    }
}

#[async_trait]
impl MailWriter for GmailClient {
    async fn create_draft(&self, raw_message: &[u8]) -> Result<String, MailError> {
        let encoded = BASE64_URL.encode(raw_message);
        let body = serde_json::json!({ "message": { "raw": encoded } });

        let url = format!("{}/drafts", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| MailError::Http {
                op: "create_draft".to_string(),
                reason: e.to_string(),
            })?;

        let draft: DraftResponse = Self::parse_json("create_draft", response).await?;
        Ok(draft.id)
    }
}
