//! Client for the assistant backend.
//!
//! Three endpoints: streaming chat, buffered chat, and the current problem.
//! All requests go through an injected [`HttpClient`]; a bearer token is
//! attached when one is supplied, and omitted otherwise.

use std::sync::Arc;

use crate::config::ChatConfig;
use crate::error::{ChatError, ChatResult, ErrorContext, NetworkError, ResultExt};
use crate::models::{ChatRequest, ChatResponse, ProblemContext};
use crate::stream::{read_text_stream, TextStream};
use crate::traits::{Headers, HttpClient, Response};

pub struct ChatApi {
    http: Arc<dyn HttpClient>,
    config: ChatConfig,
}

impl ChatApi {
    pub fn new(http: Arc<dyn HttpClient>, config: ChatConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    fn headers(token: Option<&str>, accept: &str) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), accept.to_string());
        if let Some(token) = token {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }
        headers
    }

    fn check_status(response: &Response) -> Result<(), NetworkError> {
        if response.is_success() {
            return Ok(());
        }
        Err(NetworkError::HttpStatus {
            status: response.status,
            message: response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string()),
        })
    }

    /// Send a message and return the reply as a fragment stream.
    ///
    /// Fails on connection errors, non-2xx status, or a missing body. Errors
    /// after the first fragment arrive through the stream itself.
    pub async fn stream_chat(
        &self,
        request: &ChatRequest,
        token: Option<&str>,
    ) -> ChatResult<TextStream> {
        let url = self.config.stream_url();
        let ctx = || ErrorContext::new("stream_chat").with_url(url.clone());

        let body = serde_json::to_string(request).with_context(ctx)?;
        let headers = Self::headers(token, "text/plain");

        tracing::debug!(url = %url, authenticated = token.is_some(), "chat: opening stream");
        let response = self
            .http
            .post_stream(&url, &body, &headers)
            .await
            .map_err(|e| NetworkError::from_http(e, &url))
            .with_context(ctx)?;

        read_text_stream(response.body, self.config.read_timeout).with_context(ctx)
    }

    /// Send a message and wait for the complete reply.
    pub async fn chat(&self, request: &ChatRequest, token: Option<&str>) -> ChatResult<ChatResponse> {
        let url = self.config.chat_url();
        let ctx = || ErrorContext::new("chat").with_url(url.clone());

        let body = serde_json::to_string(request).with_context(ctx)?;
        let headers = Self::headers(token, "application/json");

        let response = self
            .http
            .post(&url, &body, &headers)
            .await
            .map_err(|e| NetworkError::from_http(e, &url))
            .with_context(ctx)?;
        Self::check_status(&response).with_context(ctx)?;

        response.json::<ChatResponse>().with_context(ctx)
    }

    /// Fetch the problem the tutor is currently set up for.
    pub async fn fetch_current_problem(&self, token: Option<&str>) -> ChatResult<ProblemContext> {
        let url = self.config.problem_url();
        let ctx = || ErrorContext::new("fetch_current_problem").with_url(url.clone());

        let mut headers = Headers::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        if let Some(token) = token {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }

        let response = self
            .http
            .get(&url, &headers)
            .await
            .map_err(|e| NetworkError::from_http(e, &url))
            .with_context(ctx)?;
        Self::check_status(&response).with_context(ctx)?;

        response
            .json::<ProblemContext>()
            .map_err(ChatError::from)
            .with_context(ctx)
    }
}
