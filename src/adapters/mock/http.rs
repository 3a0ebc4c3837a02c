//! Mock HTTP client for testing.
//!
//! Responses are configured per URL (exact match first, then prefix match,
//! then the default). Streaming responses can be canned chunk lists or
//! "live" channels that a test feeds one chunk at a time.

use async_trait::async_trait;
use bytes::Bytes;
use futures::channel::mpsc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::traits::{Headers, HttpClient, HttpError, Response, StreamResponse};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method (GET or POST)
    pub method: String,
    pub url: String,
    pub headers: Headers,
    /// Request body (for POST requests)
    pub body: Option<String>,
}

impl RecordedRequest {
    /// Parse the recorded body as JSON.
    pub fn json(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_str(body).ok())
    }
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a buffered response
    Success(Response),
    /// Fail the request itself
    Error(HttpError),
    /// Stream these chunks, then end
    Stream(Vec<Bytes>),
    /// Stream these chunks, then fail with the error
    StreamThenError(Vec<Bytes>, HttpError),
    /// Succeed without a readable body
    NoBody,
}

/// Sender half of a live stream registered with [`MockHttpClient::live_stream`].
pub type LiveStreamSender = mpsc::UnboundedSender<Result<Bytes, HttpError>>;

type LiveStreamReceiver = mpsc::UnboundedReceiver<Result<Bytes, HttpError>>;

#[derive(Clone, Default)]
pub struct MockHttpClient {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    default_response: Arc<Mutex<Option<MockResponse>>>,
    live_streams: Arc<Mutex<HashMap<String, LiveStreamReceiver>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl std::fmt::Debug for MockHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockHttpClient")
            .field("responses", &self.responses.lock().unwrap().len())
            .field("live_streams", &self.live_streams.lock().unwrap().len())
            .field("requests", &self.requests.lock().unwrap().len())
            .finish()
    }
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a response for a URL (or URL prefix).
    pub fn set_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(url.to_string(), response);
    }

    pub fn set_default_response(&self, response: MockResponse) {
        let mut default = self.default_response.lock().unwrap();
        *default = Some(response);
    }

    /// Shortcut for a buffered JSON response.
    pub fn set_json(&self, url: &str, status: u16, json: serde_json::Value) {
        self.set_response(
            url,
            MockResponse::Success(Response::new(status, Bytes::from(json.to_string()))),
        );
    }

    /// Register a stream for the next `post_stream` to `url`.
    ///
    /// Chunks sent on the returned sender are delivered as they are sent;
    /// dropping the sender ends the stream. Takes precedence over
    /// [`MockHttpClient::set_response`] and is consumed by one request.
    pub fn live_stream(&self, url: &str) -> LiveStreamSender {
        let (tx, rx) = mpsc::unbounded();
        self.live_streams
            .lock()
            .unwrap()
            .insert(url.to_string(), rx);
        tx
    }

    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    fn record_request(&self, method: &str, url: &str, headers: &Headers, body: Option<String>) {
        let mut requests = self.requests.lock().unwrap();
        requests.push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body,
        });
    }

    fn get_response(&self, url: &str) -> Option<MockResponse> {
        let responses = self.responses.lock().unwrap();

        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }

        for (pattern, response) in responses.iter() {
            if url.starts_with(pattern) {
                return Some(response.clone());
            }
        }

        self.default_response.lock().unwrap().clone()
    }

    fn buffered(&self, url: &str) -> Result<Response, HttpError> {
        match self.get_response(url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            Some(_) => Err(HttpError::Other(
                "Stream response on non-stream request".to_string(),
            )),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("GET", url, headers, None);
        self.buffered(url)
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("POST", url, headers, Some(body.to_string()));
        self.buffered(url)
    }

    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<StreamResponse, HttpError> {
        self.record_request("POST", url, headers, Some(body.to_string()));

        if let Some(rx) = self.live_streams.lock().unwrap().remove(url) {
            return Ok(StreamResponse::new(200, Some(Box::pin(rx))));
        }

        match self.get_response(url) {
            Some(MockResponse::Stream(chunks)) => {
                let stream = futures::stream::iter(chunks.into_iter().map(Ok::<Bytes, HttpError>));
                Ok(StreamResponse::new(200, Some(Box::pin(stream))))
            }
            Some(MockResponse::StreamThenError(chunks, err)) => {
                let items = chunks
                    .into_iter()
                    .map(Ok::<Bytes, HttpError>)
                    .chain(std::iter::once(Err(err)));
                Ok(StreamResponse::new(200, Some(Box::pin(futures::stream::iter(items)))))
            }
            Some(MockResponse::NoBody) => Ok(StreamResponse::new(204, None)),
            Some(MockResponse::Success(response)) if !response.is_success() => {
                Err(HttpError::ServerError {
                    status: response.status,
                    message: response.text().unwrap_or_default(),
                })
            }
            Some(MockResponse::Success(response)) => {
                let stream =
                    futures::stream::iter(std::iter::once(Ok::<_, HttpError>(response.body)));
                Ok(StreamResponse::new(response.status, Some(Box::pin(stream))))
            }
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}
