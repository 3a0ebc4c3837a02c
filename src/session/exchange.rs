//! Request/response exchange bookkeeping.

use crate::models::MessageId;

/// Where the current exchange is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExchangePhase {
    #[default]
    Idle,
    /// Request issued, no response body yet.
    Sending,
    /// Fragments are being applied to the pending message.
    Streaming,
}

/// Phase plus the assistant message currently being written.
///
/// `pending` is `Some` exactly while an exchange owns a placeholder.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExchangeState {
    phase: ExchangePhase,
    pending: Option<MessageId>,
}

impl ExchangeState {
    pub fn phase(&self) -> ExchangePhase {
        self.phase
    }

    pub fn pending(&self) -> Option<MessageId> {
        self.pending
    }

    pub fn is_loading(&self) -> bool {
        self.phase != ExchangePhase::Idle
    }

    /// Claim the session for a new exchange. Returns `false` if one is
    /// already in flight.
    pub fn try_begin(&mut self) -> bool {
        if self.is_loading() {
            return false;
        }
        self.phase = ExchangePhase::Sending;
        self.pending = None;
        true
    }

    pub fn set_pending(&mut self, id: MessageId) {
        self.pending = Some(id);
    }

    pub fn begin_streaming(&mut self) {
        if self.phase == ExchangePhase::Sending {
            self.phase = ExchangePhase::Streaming;
        }
    }

    /// Back to idle, releasing the pending message.
    pub fn finish(&mut self) -> Option<MessageId> {
        self.phase = ExchangePhase::Idle;
        self.pending.take()
    }
}
