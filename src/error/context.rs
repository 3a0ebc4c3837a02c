//! Debugging context attached to errors.

use std::fmt;

use crate::models::MessageId;

/// Where an error happened: the operation plus the identifiers involved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorContext {
    /// The operation being performed (e.g. "stream_chat").
    pub operation: String,
    /// Session the operation belonged to.
    pub session_id: Option<String>,
    /// Message being written when the error occurred.
    pub message_id: Option<MessageId>,
    /// Request URL, if any.
    pub url: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            ..Default::default()
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_message_id(mut self, message_id: MessageId) -> Self {
        self.message_id = Some(message_id);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "operation={}", self.operation)?;
        if let Some(session_id) = &self.session_id {
            write!(f, ", session={}", session_id)?;
        }
        if let Some(message_id) = &self.message_id {
            write!(f, ", message={}", message_id)?;
        }
        if let Some(url) = &self.url {
            write!(f, ", url={}", url)?;
        }
        Ok(())
    }
}
