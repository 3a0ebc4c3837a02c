//! Prompt input handling for the terminal front end.
//!
//! - [`slash_command`] - `/` commands and their parser

pub mod slash_command;

pub use slash_command::{CommandError, SlashCommand};
