//! Sending a message and applying the reply.

use futures::StreamExt;

use crate::error::{ChatError, ChatResult, ResultExt, StoreError};
use crate::models::{ChatRequest, Message, MessageId};

use super::ChatSession;

/// Shown when an exchange fails. Appended as its own message so any partial
/// reply stays visible.
pub const APOLOGY_TEXT: &str =
    "Sorry, I ran into a problem reaching the tutor. Please try sending your message again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    EmptyInput,
    AlreadyInFlight,
}

/// How a call to [`ChatSession::send`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The reply was written into `message_id` and finalized.
    Completed { message_id: MessageId },
    /// The exchange failed; `apology_id` is the appended apology.
    Failed { apology_id: MessageId },
    /// Nothing happened.
    Rejected(RejectReason),
    /// The session was disposed while the exchange was running.
    Abandoned,
}

fn is_closed(err: &ChatError) -> bool {
    matches!(err.inner(), ChatError::Store(StoreError::Closed))
}

/// Holds the session's exchange slot for the life of one `send`.
///
/// Dropping it returns the session to idle. If the send future was dropped
/// before it settled, the placeholder is finalized as well.
struct ExchangeGuard<'a> {
    session: &'a ChatSession,
    settled: bool,
}

impl<'a> ExchangeGuard<'a> {
    fn new(session: &'a ChatSession) -> Self {
        Self {
            session,
            settled: false,
        }
    }

    fn settle(mut self, outcome: SendOutcome) -> SendOutcome {
        self.settled = true;
        outcome
    }
}

impl Drop for ExchangeGuard<'_> {
    fn drop(&mut self) {
        let pending = self.session.exchange().finish();
        if self.settled {
            return;
        }
        if let Some(id) = pending {
            tracing::debug!(message_id = %id, "chat: exchange cancelled");
            // Closed store means the session is gone; nothing left to mark.
            let _ = self.session.store.finalize(id);
        }
    }
}

impl ChatSession {
    /// Send the current contents of the input buffer.
    pub async fn submit_input(&self) -> SendOutcome {
        let text = self.input();
        self.send(&text).await
    }

    /// Run one exchange: record the user's message, stream the assistant's
    /// reply into a placeholder, and recover from any failure with an apology.
    ///
    /// Blank input and sends while another exchange is in flight are no-ops.
    pub async fn send(&self, raw_input: &str) -> SendOutcome {
        let text = raw_input.trim();
        if text.is_empty() {
            tracing::debug!("chat: ignoring empty input");
            return SendOutcome::Rejected(RejectReason::EmptyInput);
        }
        if self.is_disposed() {
            return SendOutcome::Abandoned;
        }
        if !self.exchange().try_begin() {
            tracing::debug!("chat: exchange already in flight");
            return SendOutcome::Rejected(RejectReason::AlreadyInFlight);
        }
        let guard = ExchangeGuard::new(self);

        let problem_id = self.problem_id();
        let user_message = Message::user(text, problem_id.is_some());
        if self.store.append(user_message).is_err() {
            return guard.settle(SendOutcome::Abandoned);
        }

        self.clear_input();
        self.visibility.on_send();

        let pending = match self.store.append(Message::assistant_placeholder()) {
            Ok(id) => id,
            Err(_) => return guard.settle(SendOutcome::Abandoned),
        };
        self.exchange().set_pending(pending);

        let token = self.auth.access_token().await;
        let request = ChatRequest::new(text)
            .with_problem_id(problem_id)
            .with_session_id(self.id.clone());

        tracing::info!(
            session_id = %self.id,
            message_id = %pending,
            authenticated = token.is_some(),
            streaming = self.api.config().streaming,
            "chat: sending"
        );

        let result = if self.api.config().streaming {
            self.stream_reply(&request, token.as_deref(), pending).await
        } else {
            self.buffered_reply(&request, token.as_deref(), pending).await
        };

        let outcome = match result {
            Ok(()) => match self.store.finalize(pending) {
                Ok(()) => {
                    tracing::info!(message_id = %pending, "chat: reply complete");
                    SendOutcome::Completed {
                        message_id: pending,
                    }
                }
                Err(_) => SendOutcome::Abandoned,
            },
            Err(err) if is_closed(&err) => {
                tracing::debug!(message_id = %pending, "chat: session closed mid-exchange");
                SendOutcome::Abandoned
            }
            Err(err) => self.recover(pending, &err),
        };

        guard.settle(outcome)
    }

    /// Leave the placeholder as it is and append the apology.
    fn recover(&self, pending: MessageId, err: &ChatError) -> SendOutcome {
        tracing::warn!(
            error_code = err.error_code(),
            category = ?err.category(),
            error = %err,
            message_id = %pending,
            "chat: exchange failed"
        );

        // Partial output stays exactly as received.
        let _ = self.store.finalize(pending);

        match self.store.append(Message::assistant(APOLOGY_TEXT)) {
            Ok(apology_id) => SendOutcome::Failed { apology_id },
            Err(_) => SendOutcome::Abandoned,
        }
    }

    async fn stream_reply(
        &self,
        request: &ChatRequest,
        token: Option<&str>,
        pending: MessageId,
    ) -> ChatResult<()> {
        let mut fragments = self.api.stream_chat(request, token).await?;
        self.exchange().begin_streaming();

        let mut buffer = String::new();
        while let Some(fragment) = fragments.next().await {
            let fragment = fragment.with_context(|| {
                self.error_context("read_stream").with_message_id(pending)
            })?;
            tracing::debug!(message_id = %pending, bytes = fragment.len(), "chat: fragment");
            buffer.push_str(&fragment);
            self.store
                .update_text(pending, buffer.as_str())
                .with_context(|| self.error_context("apply_fragment").with_message_id(pending))?;
        }
        Ok(())
    }

    async fn buffered_reply(
        &self,
        request: &ChatRequest,
        token: Option<&str>,
        pending: MessageId,
    ) -> ChatResult<()> {
        let reply = self.api.chat(request, token).await?;
        self.exchange().begin_streaming();
        if reply.out_of_scope {
            tracing::info!(message_id = %pending, "chat: reply flagged out of scope");
        }
        self.store
            .update_text(pending, reply.response)
            .with_context(|| self.error_context("apply_reply").with_message_id(pending))
    }
}
