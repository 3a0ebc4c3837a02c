//! Message store mutation errors.

use thiserror::Error;

use crate::models::MessageId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("message {0} not found")]
    NotFound(MessageId),

    #[error("message {0} is finalized and can no longer change")]
    Finalized(MessageId),

    #[error("message store is closed")]
    Closed,
}

impl StoreError {
    pub fn error_code(&self) -> &'static str {
        match self {
            StoreError::NotFound(_) => "STORE_NOT_FOUND",
            StoreError::Finalized(_) => "STORE_FINALIZED",
            StoreError::Closed => "STORE_CLOSED",
        }
    }
}
