//! Authentication context for chat requests.

pub mod session;
pub mod state;

pub use session::AuthSession;
pub use state::AuthState;
