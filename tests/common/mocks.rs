//! Mock configurations for test fixtures.
//!
//! Re-exports the mock transport from `tutorchat::adapters::mock` and adds a
//! builder for the responses the chat endpoints usually need.

pub use tutorchat::adapters::mock::{LiveStreamSender, MockHttpClient, MockResponse};
pub use tutorchat::traits::HttpError;

use bytes::Bytes;

use super::{problem_url, stream_url};

/// Configuration for setting up mock HTTP responses.
pub struct MockHttpConfig {
    client: MockHttpClient,
}

impl MockHttpConfig {
    pub fn new() -> Self {
        Self {
            client: MockHttpClient::new(),
        }
    }

    /// Current-problem endpoint answers with this JSON.
    pub fn with_problem(self, json: serde_json::Value) -> Self {
        self.client.set_json(&problem_url(), 200, json);
        self
    }

    pub fn with_json_response(self, url: &str, status: u16, json: serde_json::Value) -> Self {
        self.client.set_json(url, status, json);
        self
    }

    /// Streaming endpoint delivers these chunks, then ends.
    pub fn with_stream_chunks(self, chunks: &[&str]) -> Self {
        self.client.set_response(
            &stream_url(),
            MockResponse::Stream(chunks.iter().map(|c| Bytes::from(c.to_string())).collect()),
        );
        self
    }

    pub fn with_error(self, url: &str, error: HttpError) -> Self {
        self.client.set_response(url, MockResponse::Error(error));
        self
    }

    pub fn build(self) -> MockHttpClient {
        self.client
    }
}

impl Default for MockHttpConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Send one text chunk on a live stream.
pub fn push(tx: &LiveStreamSender, text: &str) {
    tx.unbounded_send(Ok(Bytes::from(text.to_string())))
        .expect("live stream receiver dropped");
}
