//! Streaming-related error types.

use std::fmt;

/// Failures while reading an incrementally delivered response body.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamError {
    /// The response carried no readable body.
    Unavailable,

    /// The transport failed after the stream had started.
    Interrupted { message: String },
}

impl StreamError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, StreamError::Interrupted { .. })
    }

    pub fn user_message(&self) -> String {
        match self {
            StreamError::Unavailable => "The assistant sent an empty response.".to_string(),
            StreamError::Interrupted { .. } => {
                "The connection was lost while the assistant was replying.".to_string()
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::Unavailable => "STREAM_UNAVAILABLE",
            StreamError::Interrupted { .. } => "STREAM_INTERRUPTED",
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::Unavailable => write!(f, "Response has no readable body"),
            StreamError::Interrupted { message } => write!(f, "Stream interrupted: {}", message),
        }
    }
}

impl std::error::Error for StreamError {}
