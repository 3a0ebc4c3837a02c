//! tutorchat - streaming chat session for a problem-solving tutor
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod input;
pub mod models;
pub mod session;
pub mod store;
pub mod stream;
pub mod traits;
pub mod ui;
pub mod view_state;
