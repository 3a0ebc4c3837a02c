//! Authenticated identity as seen by the chat client.

use serde::{Deserialize, Serialize};

/// Tokens for the signed-in user.
///
/// Only the access token is sent to the assistant; the rest is carried so
/// listeners can tell who signed in and when the token lapses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AuthSession {
    /// Bearer token attached to chat requests.
    pub access_token: String,
    /// Refresh token, if the identity provider issued one.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Expiration as Unix timestamp (seconds). `None` means no known expiry.
    #[serde(default)]
    pub expires_at: Option<i64>,
    /// The authenticated user's ID.
    #[serde(default)]
    pub user_id: Option<String>,
}

impl AuthSession {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            ..Default::default()
        }
    }

    pub fn with_expires_at(mut self, expires_at: i64) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Check if the token is expired.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => chrono::Utc::now().timestamp() >= expires_at,
            None => false,
        }
    }

    /// Has a non-empty token that has not expired.
    pub fn is_valid(&self) -> bool {
        !self.access_token.is_empty() && !self.is_expired()
    }
}
