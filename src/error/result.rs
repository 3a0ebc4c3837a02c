//! Result type alias for chat operations.

use super::chat_error::ChatError;
use super::context::ErrorContext;

pub type ChatResult<T> = Result<T, ChatError>;

/// Extension trait for attaching [`ErrorContext`] to results.
pub trait ResultExt<T> {
    fn context(self, ctx: ErrorContext) -> ChatResult<T>;

    /// Like [`ResultExt::context`], building the context only on error.
    fn with_context<F>(self, f: F) -> ChatResult<T>
    where
        F: FnOnce() -> ErrorContext;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<ChatError>,
{
    fn context(self, ctx: ErrorContext) -> ChatResult<T> {
        self.map_err(|e| e.into().with_context(ctx))
    }

    fn with_context<F>(self, f: F) -> ChatResult<T>
    where
        F: FnOnce() -> ErrorContext,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}
