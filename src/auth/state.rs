//! Process-wide authentication state.
//!
//! `AuthState` is created once at startup, updated through `sign_in` /
//! `sign_out`, and handed to sessions as an [`AuthProvider`]. Listeners
//! registered with [`AuthState::on_auth_change`] run on their own task and
//! stop when the returned handle is aborted or the state is dropped.

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::session::AuthSession;
use crate::traits::AuthProvider;

#[derive(Debug)]
pub struct AuthState {
    tx: watch::Sender<Option<AuthSession>>,
}

impl AuthState {
    /// Signed-out state.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub fn with_session(session: AuthSession) -> Self {
        let (tx, _rx) = watch::channel(Some(session));
        Self { tx }
    }

    /// Replace the current session and notify listeners.
    pub fn sign_in(&self, session: AuthSession) {
        tracing::info!(user_id = ?session.user_id, "auth: signed in");
        self.tx.send_replace(Some(session));
    }

    /// Drop the current session. No-op (and no notification) when already signed out.
    pub fn sign_out(&self) {
        let changed = self.tx.send_if_modified(|current| current.take().is_some());
        if changed {
            tracing::info!("auth: signed out");
        }
    }

    pub fn current(&self) -> Option<AuthSession> {
        self.tx.borrow().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.tx.borrow().as_ref().is_some_and(AuthSession::is_valid)
    }

    /// Spawn a listener that is called with the new session after every change.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn on_auth_change<F>(&self, mut listener: F) -> JoinHandle<()>
    where
        F: FnMut(Option<&AuthSession>) + Send + 'static,
    {
        let mut rx = self.tx.subscribe();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let session = rx.borrow_and_update().clone();
                listener(session.as_ref());
            }
        })
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthProvider for AuthState {
    async fn access_token(&self) -> Option<String> {
        self.tx
            .borrow()
            .as_ref()
            .filter(|session| session.is_valid())
            .map(|session| session.access_token.clone())
    }

    fn subscribe(&self) -> watch::Receiver<Option<AuthSession>> {
        self.tx.subscribe()
    }
}
