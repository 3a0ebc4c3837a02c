//! Line-oriented rendering of the conversation.
//!
//! The printer is handed full snapshots of the store and writes only what is
//! new since the previous call, so a streaming reply appears as it grows.

use std::collections::HashMap;
use std::io::{self, Write};

use crate::models::{Author, Message, MessageId};

const USER_LABEL: &str = "you";
const ASSISTANT_LABEL: &str = "tutor";

pub struct TranscriptPrinter<W: Write> {
    out: W,
    /// Bytes of each message's text already written.
    printed: HashMap<MessageId, usize>,
    /// Message whose line has not been terminated yet.
    open: Option<MessageId>,
    echo_user: bool,
}

impl<W: Write> TranscriptPrinter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            printed: HashMap::new(),
            open: None,
            echo_user: true,
        }
    }

    /// Skip user messages during incremental rendering. The terminal already
    /// shows what was typed.
    pub fn without_user_echo(mut self) -> Self {
        self.echo_user = false;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn label(author: Author) -> &'static str {
        match author {
            Author::User => USER_LABEL,
            Author::Assistant => ASSISTANT_LABEL,
        }
    }

    fn close_open_line(&mut self) -> io::Result<()> {
        if self.open.take().is_some() {
            writeln!(self.out)?;
        }
        Ok(())
    }

    /// Write whatever changed since the last call.
    pub fn render(&mut self, messages: &[Message]) -> io::Result<()> {
        for message in messages {
            if message.is_user() && !self.echo_user {
                self.printed.insert(message.id, message.text.len());
                continue;
            }

            match self.printed.get(&message.id).copied() {
                None => {
                    self.close_open_line()?;
                    write!(self.out, "{}> {}", Self::label(message.author), message.text)?;
                    self.printed.insert(message.id, message.text.len());
                    if message.is_streaming {
                        self.open = Some(message.id);
                    } else {
                        writeln!(self.out)?;
                    }
                }
                Some(done) => {
                    if let Some(rest) = message.text.get(done..).filter(|rest| !rest.is_empty()) {
                        write!(self.out, "{}", rest)?;
                        self.printed.insert(message.id, message.text.len());
                    }
                    if !message.is_streaming && self.open == Some(message.id) {
                        self.close_open_line()?;
                    }
                }
            }
        }
        self.out.flush()
    }

    /// Print the whole conversation from the top and mark it all as shown.
    pub fn reprint(&mut self, messages: &[Message]) -> io::Result<()> {
        self.close_open_line()?;
        for message in messages {
            writeln!(self.out, "{}> {}", Self::label(message.author), message.text)?;
            self.printed.insert(message.id, message.text.len());
        }
        self.out.flush()
    }
}
