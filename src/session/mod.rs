//! One conversation with the tutor.
//!
//! [`ChatSession`] owns the message store, the exchange state, the problem
//! context and the input buffer. Behaviour is split across files the same
//! way the state is:
//!
//! - `controller.rs` - sending a message and applying the reply
//! - `bootstrap.rs` - loading the problem and seeding the greeting
//! - `exchange.rs` - phase bookkeeping for the in-flight request
//!
//! The session is `Send + Sync` and meant to be shared through `Arc`. No lock
//! is held across an `.await`.

mod bootstrap;
mod controller;
pub mod exchange;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use crate::api::ChatApi;
use crate::error::ErrorContext;
use crate::models::{Message, MessageId, ProblemContext};
use crate::store::MessageStore;
use crate::traits::AuthProvider;
use crate::view_state::{Visibility, VisibilityState};

pub use bootstrap::{BootstrapOutcome, BOOTSTRAP_FAILURE_TEXT};
pub use controller::{RejectReason, SendOutcome, APOLOGY_TEXT};
pub use exchange::{ExchangePhase, ExchangeState};

pub struct ChatSession {
    id: String,
    api: Arc<ChatApi>,
    auth: Arc<dyn AuthProvider>,
    visibility: Arc<VisibilityState>,
    store: MessageStore,
    exchange: Mutex<ExchangeState>,
    problem: RwLock<Option<ProblemContext>>,
    input: Mutex<String>,
    bootstrapped: AtomicBool,
    disposed: AtomicBool,
}

impl ChatSession {
    pub fn new(
        api: Arc<ChatApi>,
        auth: Arc<dyn AuthProvider>,
        visibility: Arc<VisibilityState>,
    ) -> Self {
        let id = uuid::Uuid::new_v4().to_string();
        tracing::info!(session_id = %id, "session: created");
        Self {
            id,
            api,
            auth,
            visibility,
            store: MessageStore::new(),
            exchange: Mutex::new(ExchangeState::default()),
            problem: RwLock::new(None),
            input: Mutex::new(String::new()),
            bootstrapped: AtomicBool::new(false),
            disposed: AtomicBool::new(false),
        }
    }

    /// Session id sent with every chat request.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn messages(&self) -> Vec<Message> {
        self.store.snapshot()
    }

    pub fn visibility(&self) -> &VisibilityState {
        &self.visibility
    }

    pub fn problem(&self) -> Option<ProblemContext> {
        self.problem
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_problem(&self, problem: ProblemContext) {
        *self.problem.write().unwrap_or_else(PoisonError::into_inner) = Some(problem);
    }

    fn problem_id(&self) -> Option<String> {
        self.problem
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|problem| problem.id.clone())
    }

    fn exchange(&self) -> MutexGuard<'_, ExchangeState> {
        self.exchange.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_loading(&self) -> bool {
        self.exchange().is_loading()
    }

    pub fn phase(&self) -> ExchangePhase {
        self.exchange().phase()
    }

    /// The assistant message currently receiving fragments.
    pub fn pending_message_id(&self) -> Option<MessageId> {
        self.exchange().pending()
    }

    pub fn input(&self) -> String {
        self.input.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn set_input(&self, text: impl Into<String>) {
        *self.input.lock().unwrap_or_else(PoisonError::into_inner) = text.into();
    }

    fn clear_input(&self) {
        self.input.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    /// The input field gained focus.
    pub fn focus_input(&self) -> Visibility {
        self.visibility.on_input_focus(!self.store.is_empty())
    }

    /// Tear the session down. Later stream fragments are dropped and the
    /// history is frozen as it is.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.store.close();
        tracing::info!(session_id = %self.id, "session: disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    fn error_context(&self, operation: &str) -> ErrorContext {
        ErrorContext::new(operation).with_session_id(self.id.clone())
    }
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("id", &self.id)
            .field("messages", &self.store.len())
            .field("exchange", &*self.exchange())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
