//! Unified error type for chat operations.

use std::fmt;

use super::category::ErrorCategory;
use super::context::ErrorContext;
use super::network::NetworkError;
use super::store::StoreError;
use super::stream::StreamError;

/// Every failure the session can observe, with categorization and a
/// user-facing message.
#[derive(Debug)]
pub enum ChatError {
    /// Transport failures (connection, HTTP status, bad payload).
    Network(NetworkError),

    /// Failures while consuming a response stream.
    Stream(StreamError),

    /// Message store rejected a mutation.
    Store(StoreError),

    /// Wrapped error with additional context.
    WithContext {
        error: Box<ChatError>,
        context: ErrorContext,
    },
}

impl ChatError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ChatError::Network(NetworkError::HttpStatus { status, .. }) => match *status {
                401 | 403 => ErrorCategory::Auth,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Client,
            },
            ChatError::Network(NetworkError::InvalidResponse { .. }) => ErrorCategory::Client,
            ChatError::Network(_) => ErrorCategory::Network,
            ChatError::Stream(StreamError::Interrupted { .. }) => ErrorCategory::Network,
            ChatError::Stream(StreamError::Unavailable) => ErrorCategory::Server,
            ChatError::Store(_) => ErrorCategory::Client,
            ChatError::WithContext { error, .. } => error.category(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            ChatError::Network(err) => err.is_retryable(),
            ChatError::Stream(err) => err.is_retryable(),
            ChatError::Store(_) => false,
            ChatError::WithContext { error, .. } => error.is_retryable(),
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            ChatError::Network(err) => err.user_message(),
            ChatError::Stream(err) => err.user_message(),
            ChatError::Store(err) => err.to_string(),
            ChatError::WithContext { error, .. } => error.user_message(),
        }
    }

    /// Short error code for log fields.
    pub fn error_code(&self) -> &'static str {
        match self {
            ChatError::Network(err) => err.error_code(),
            ChatError::Stream(err) => err.error_code(),
            ChatError::Store(err) => err.error_code(),
            ChatError::WithContext { error, .. } => error.error_code(),
        }
    }

    pub fn with_context(self, ctx: ErrorContext) -> Self {
        ChatError::WithContext {
            error: Box::new(self),
            context: ctx,
        }
    }

    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            ChatError::WithContext { context, .. } => Some(context),
            _ => None,
        }
    }

    /// The innermost error, with any context wrappers removed.
    pub fn inner(&self) -> &ChatError {
        match self {
            ChatError::WithContext { error, .. } => error.inner(),
            _ => self,
        }
    }
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Network(err) => write!(f, "{}", err),
            ChatError::Stream(err) => write!(f, "{}", err),
            ChatError::Store(err) => write!(f, "{}", err),
            ChatError::WithContext { error, context } => write!(f, "{} ({})", error, context),
        }
    }
}

impl std::error::Error for ChatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChatError::Network(err) => Some(err),
            ChatError::Stream(err) => Some(err),
            ChatError::Store(err) => Some(err),
            ChatError::WithContext { error, .. } => error.source(),
        }
    }
}

impl From<NetworkError> for ChatError {
    fn from(err: NetworkError) -> Self {
        ChatError::Network(err)
    }
}

impl From<StreamError> for ChatError {
    fn from(err: StreamError) -> Self {
        ChatError::Stream(err)
    }
}

impl From<StoreError> for ChatError {
    fn from(err: StoreError) -> Self {
        ChatError::Store(err)
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Network(NetworkError::InvalidResponse {
            message: err.to_string(),
        })
    }
}
