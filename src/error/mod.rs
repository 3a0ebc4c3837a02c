//! Error handling for the chat session.
//!
//! - **Domain errors**: [`NetworkError`], [`StreamError`], [`StoreError`]
//! - **Unified type**: [`ChatError`] with [`ErrorCategory`], error codes and
//!   user-facing messages
//! - **Context**: [`ErrorContext`] attached through [`ResultExt`]
//!
//! The conversation controller never lets a `ChatError` escape: every
//! failure ends in a visible message and a reset loading flag. These types
//! exist so the failure can be logged and classified on the way.

mod category;
mod chat_error;
mod context;
mod network;
mod result;
mod store;
mod stream;

pub use category::ErrorCategory;
pub use chat_error::ChatError;
pub use context::ErrorContext;
pub use network::NetworkError;
pub use result::{ChatResult, ResultExt};
pub use store::StoreError;
pub use stream::StreamError;

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::models::MessageId;

    #[test]
    fn test_categories() {
        let status: ChatError = NetworkError::HttpStatus {
            status: 502,
            message: "bad gateway".to_string(),
        }
        .into();
        assert_eq!(status.category(), ErrorCategory::Server);

        let auth: ChatError = NetworkError::HttpStatus {
            status: 401,
            message: String::new(),
        }
        .into();
        assert_eq!(auth.category(), ErrorCategory::Auth);

        let lost: ChatError = StreamError::Interrupted {
            message: "eof".to_string(),
        }
        .into();
        assert_eq!(lost.category(), ErrorCategory::Network);

        let store: ChatError = StoreError::NotFound(MessageId::new(1)).into();
        assert_eq!(store.category(), ErrorCategory::Client);
    }

    #[test]
    fn test_context_propagation() {
        fn failing() -> Result<(), StreamError> {
            Err(StreamError::Unavailable)
        }

        let err = failing()
            .context(ErrorContext::new("stream_chat").with_session_id("s-1"))
            .unwrap_err();

        assert_eq!(err.context().unwrap().operation, "stream_chat");
        assert_eq!(err.error_code(), "STREAM_UNAVAILABLE");
        assert!(matches!(err.inner(), ChatError::Stream(StreamError::Unavailable)));
        assert!(err.to_string().contains("operation=stream_chat"));
    }

    #[test]
    fn test_json_error_is_invalid_response() {
        let json_err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let err: ChatError = json_err.into();
        assert_eq!(err.error_code(), "NET_INVALID_RESPONSE");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_user_messages_not_empty() {
        let errors: Vec<ChatError> = vec![
            NetworkError::Cancelled.into(),
            StreamError::Unavailable.into(),
            StoreError::Closed.into(),
        ];
        for err in errors {
            assert!(!err.user_message().is_empty());
        }
    }
}
