//! Trait abstractions for the session's external collaborators.
//!
//! - [`HttpClient`] - transport to the assistant and problem endpoints
//! - [`AuthProvider`] - optional bearer token and auth-change notification

pub mod auth;
pub mod http;

pub use auth::AuthProvider;
pub use http::{ByteStream, Headers, HttpClient, HttpError, Response, StreamResponse};
