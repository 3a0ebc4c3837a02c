//! Common test utilities for integration tests.
//!
//! Provides a session builder over [`MockHttpClient`], canned problem
//! payloads and a helper for waiting on store updates.
//!
//! # Example
//!
//! ```ignore
//! use common::{TestSessionBuilder, MockHttpConfig};
//!
//! let mock = MockHttpConfig::new().with_problem(two_sum_json()).build();
//! let session = TestSessionBuilder::new(&mock).build();
//! ```

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use std::sync::Arc;
use std::time::Duration;

use tutorchat::api::ChatApi;
use tutorchat::auth::{AuthSession, AuthState};
use tutorchat::config::ChatConfig;
use tutorchat::models::Message;
use tutorchat::session::ChatSession;
use tutorchat::view_state::VisibilityState;

pub const BASE_URL: &str = "http://tutor.test";

pub fn stream_url() -> String {
    format!("{}/chat/stream", BASE_URL)
}

pub fn chat_url() -> String {
    format!("{}/chat", BASE_URL)
}

pub fn problem_url() -> String {
    format!("{}/problems/current", BASE_URL)
}

/// Session that won't expire during test execution.
pub fn test_auth_session() -> AuthSession {
    AuthSession::new("test-access-token-12345")
        .with_expires_at(i64::MAX)
        .with_user_id("test-user-id")
}

pub fn two_sum_json() -> serde_json::Value {
    serde_json::json!({
        "id": "two_sum",
        "title": "Two Sum",
        "description": "Find two numbers that add to target",
        "difficulty_level": "beginner",
        "category": "arrays",
        "total_steps": 3
    })
}

/// Builder for a [`ChatSession`] wired to a mock transport.
pub struct TestSessionBuilder {
    http: MockHttpClient,
    config: ChatConfig,
    auth: Arc<AuthState>,
}

impl TestSessionBuilder {
    pub fn new(http: &MockHttpClient) -> Self {
        Self {
            http: http.clone(),
            config: ChatConfig::default().with_base_url(BASE_URL),
            auth: Arc::new(AuthState::new()),
        }
    }

    pub fn with_auth(mut self, auth: Arc<AuthState>) -> Self {
        self.auth = auth;
        self
    }

    pub fn signed_in(self) -> Self {
        self.with_auth(Arc::new(AuthState::with_session(test_auth_session())))
    }

    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.config = self.config.with_streaming(streaming);
        self
    }

    pub fn with_read_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config = self.config.with_read_timeout(timeout);
        self
    }

    pub fn build(self) -> Arc<ChatSession> {
        let api = ChatApi::new(Arc::new(self.http), self.config);
        Arc::new(ChatSession::new(
            Arc::new(api),
            self.auth,
            Arc::new(VisibilityState::new()),
        ))
    }
}

/// Wait until the message list satisfies `predicate`, failing after two seconds.
pub async fn wait_for<F>(session: &ChatSession, mut predicate: F)
where
    F: FnMut(&[Message]) -> bool,
{
    let mut revisions = session.store().subscribe();
    let waited = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if predicate(&session.messages()) {
                return;
            }
            if revisions.changed().await.is_err() {
                return;
            }
        }
    })
    .await;
    assert!(waited.is_ok(), "timed out waiting for store: {:?}", session.messages());
}
