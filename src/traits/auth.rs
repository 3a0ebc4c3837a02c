//! Authentication capability.
//!
//! The chat session only needs two things from identity management: the
//! current bearer token, if any, and a way to hear about sign-in/sign-out.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::auth::AuthSession;

/// Trait for the process-wide authentication context.
///
/// A `None` token is a valid answer: unauthenticated chat is allowed.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Current access token, or `None` when signed out or expired.
    async fn access_token(&self) -> Option<String>;

    /// Subscribe to auth changes. The receiver always holds the latest session.
    fn subscribe(&self) -> watch::Receiver<Option<AuthSession>>;
}
