//! Test doubles for the trait abstractions.
//!
//! - [`MockHttpClient`] - HTTP client with configurable and live-fed responses

pub mod http;

pub use http::{LiveStreamSender, MockHttpClient, MockResponse, RecordedRequest};
