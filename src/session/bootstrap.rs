//! Session start: load the active problem and seed the greeting.

use std::sync::atomic::Ordering;

use crate::error::{ChatResult, ResultExt};
use crate::models::{Message, ProblemContext};

use super::ChatSession;

/// Seeded instead of the greeting when the problem cannot be loaded.
pub const BOOTSTRAP_FAILURE_TEXT: &str =
    "I couldn't load today's problem. You can still ask me questions while I try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// Problem loaded and greeting seeded.
    Loaded,
    /// Problem unavailable; the failure notice was seeded.
    Failed,
    /// Bootstrap had already run for this session.
    AlreadyRan,
}

impl ChatSession {
    /// Fetch the problem context and seed the first assistant message.
    /// Runs at most once per session.
    pub async fn bootstrap(&self) -> BootstrapOutcome {
        if self.bootstrapped.swap(true, Ordering::SeqCst) {
            return BootstrapOutcome::AlreadyRan;
        }

        match self.load_problem().await {
            Ok(problem) => {
                tracing::info!(
                    session_id = %self.id,
                    problem_id = %problem.id,
                    title = %problem.title,
                    "bootstrap: problem loaded"
                );
                let greeting = problem.greeting();
                self.set_problem(problem);
                self.seed(greeting);
                BootstrapOutcome::Loaded
            }
            Err(err) => {
                tracing::warn!(
                    error_code = err.error_code(),
                    error = %err,
                    "bootstrap: problem unavailable"
                );
                self.seed(BOOTSTRAP_FAILURE_TEXT.to_string());
                BootstrapOutcome::Failed
            }
        }
    }

    /// Re-fetch the problem context. Replaces it on success; the history is
    /// not touched either way.
    pub async fn refresh_problem(&self) -> ChatResult<ProblemContext> {
        let problem = self.load_problem().await?;
        tracing::info!(problem_id = %problem.id, "bootstrap: problem refreshed");
        self.set_problem(problem.clone());
        Ok(problem)
    }

    async fn load_problem(&self) -> ChatResult<ProblemContext> {
        let token = self.auth.access_token().await;
        self.api
            .fetch_current_problem(token.as_deref())
            .await
            .with_context(|| self.error_context("bootstrap"))
    }

    fn seed(&self, text: String) {
        if let Err(err) = self.store.append(Message::assistant(text)) {
            tracing::debug!(error = %err, "bootstrap: session closed before seeding");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::api::ChatApi;
    use crate::auth::AuthState;
    use crate::config::ChatConfig;
    use crate::models::Author;
    use crate::traits::HttpError;
    use crate::view_state::VisibilityState;

    const PROBLEM_URL: &str = "http://tutor.test/problems/current";

    fn session(mock: &MockHttpClient) -> ChatSession {
        let api = ChatApi::new(
            Arc::new(mock.clone()),
            ChatConfig::default().with_base_url("http://tutor.test"),
        );
        ChatSession::new(
            Arc::new(api),
            Arc::new(AuthState::new()),
            Arc::new(VisibilityState::new()),
        )
    }

    fn two_sum_json() -> serde_json::Value {
        serde_json::json!({
            "id": "two_sum",
            "title": "Two Sum",
            "description": "Find two numbers that add to target",
            "difficulty_level": "beginner",
            "category": "arrays",
            "total_steps": 3
        })
    }

    #[tokio::test]
    async fn test_bootstrap_seeds_greeting() {
        let mock = MockHttpClient::new();
        mock.set_json(PROBLEM_URL, 200, two_sum_json());
        let session = session(&mock);

        assert_eq!(session.bootstrap().await, BootstrapOutcome::Loaded);

        let messages = session.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].author, Author::Assistant);
        assert!(messages[0].text.contains("Two Sum"));
        assert!(messages[0].text.contains("Find two numbers that add to target"));
        assert_eq!(session.problem().unwrap().id, "two_sum");
    }

    #[tokio::test]
    async fn test_bootstrap_runs_once() {
        let mock = MockHttpClient::new();
        mock.set_json(PROBLEM_URL, 200, two_sum_json());
        let session = session(&mock);

        session.bootstrap().await;
        assert_eq!(session.bootstrap().await, BootstrapOutcome::AlreadyRan);
        assert_eq!(session.messages().len(), 1);
        assert_eq!(mock.get_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_bootstrap_failure_seeds_notice() {
        let mock = MockHttpClient::new();
        mock.set_response(
            PROBLEM_URL,
            MockResponse::Error(HttpError::ConnectionFailed("refused".to_string())),
        );
        let session = session(&mock);

        assert_eq!(session.bootstrap().await, BootstrapOutcome::Failed);
        let messages = session.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, BOOTSTRAP_FAILURE_TEXT);
        assert!(session.problem().is_none());
    }

    #[tokio::test]
    async fn test_bootstrap_non_success_status() {
        let mock = MockHttpClient::new();
        mock.set_json(PROBLEM_URL, 503, serde_json::json!({"detail": "down"}));
        let session = session(&mock);

        assert_eq!(session.bootstrap().await, BootstrapOutcome::Failed);
        assert!(session.problem().is_none());
    }

    #[tokio::test]
    async fn test_refresh_replaces_context_without_seeding() {
        let mock = MockHttpClient::new();
        mock.set_json(PROBLEM_URL, 200, two_sum_json());
        let session = session(&mock);
        session.bootstrap().await;

        mock.set_json(
            PROBLEM_URL,
            200,
            serde_json::json!({
                "id": "math_sequence",
                "title": "Mathematical Sequence Problem",
                "description": "Find the next number in the sequence: 2, 4, 8, 16, ?"
            }),
        );
        let problem = session.refresh_problem().await.unwrap();

        assert_eq!(problem.id, "math_sequence");
        assert_eq!(session.problem().unwrap().id, "math_sequence");
        assert_eq!(session.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_context() {
        let mock = MockHttpClient::new();
        mock.set_json(PROBLEM_URL, 200, two_sum_json());
        let session = session(&mock);
        session.bootstrap().await;

        mock.set_response(PROBLEM_URL, MockResponse::Error(HttpError::Cancelled));
        assert!(session.refresh_problem().await.is_err());
        assert_eq!(session.problem().unwrap().id, "two_sum");
    }
}
