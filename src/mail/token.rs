//! Stored OAuth token loading.
//!
//! The authorization flow itself is external; this only reads the token
//! file it leaves behind and hands the access token to the Gmail client.

use std::path::Path;

use secrecy::SecretString;
use serde::Deserialize;

use crate::error::MailError;

#[derive(Deserialize)]
struct StoredToken {
    access_token: SecretString,
}

/// Load the access token from a stored token file (JSON with at least an
/// `access_token` field). Refresh is owned by the external auth flow.
pub fn load_access_token(path: &Path) -> Result<SecretString, MailError> {
    let contents = std::fs::read_to_string(path).map_err(|e| MailError::TokenLoad {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let token: StoredToken =
        serde_json::from_str(&contents).map_err(|e| MailError::TokenLoad {
            path: path.display().to_string(),
            reason: format!("invalid token file: {e}"),
        })?;

    Ok(token.access_token)
}
