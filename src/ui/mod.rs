//! Terminal rendering for the chat front end.

pub mod transcript;

pub use transcript::TranscriptPrinter;
