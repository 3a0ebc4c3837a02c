use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a message within one session.
///
/// Assigned by the message store from a counter, so later messages always
/// have larger ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(u64);

impl MessageId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who wrote a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Assistant,
}

/// One turn in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Store-assigned id. Placeholder value until appended.
    pub id: MessageId,
    pub text: String,
    pub author: Author,
    pub created_at: DateTime<Utc>,
    /// True when the user message is an attempted answer to the active problem.
    #[serde(default)]
    pub is_solution_submission: bool,
    /// Whether the message may still receive text updates.
    #[serde(default)]
    pub is_streaming: bool,
}

impl Message {
    fn build(author: Author, text: String) -> Self {
        Self {
            id: MessageId::new(0),
            text,
            author,
            created_at: Utc::now(),
            is_solution_submission: false,
            is_streaming: false,
        }
    }

    pub fn user(text: impl Into<String>, is_solution_submission: bool) -> Self {
        Self {
            is_solution_submission,
            ..Self::build(Author::User, text.into())
        }
    }

    /// A complete assistant message (greeting, notice, apology).
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::build(Author::Assistant, text.into())
    }

    /// An empty assistant message that will be filled by stream fragments.
    pub fn assistant_placeholder() -> Self {
        Self {
            is_streaming: true,
            ..Self::build(Author::Assistant, String::new())
        }
    }

    pub fn is_user(&self) -> bool {
        self.author == Author::User
    }

    pub fn is_assistant(&self) -> bool {
        self.author == Author::Assistant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        let msg = Message::user("hello", true);
        assert!(msg.is_user());
        assert!(msg.is_solution_submission);
        assert!(!msg.is_streaming);
        assert_eq!(msg.text, "hello");
    }

    #[test]
    fn test_placeholder_is_streaming_and_empty() {
        let msg = Message::assistant_placeholder();
        assert!(msg.is_assistant());
        assert!(msg.is_streaming);
        assert!(msg.text.is_empty());
        assert!(!msg.is_solution_submission);
    }

    #[test]
    fn test_message_id_ordering_and_display() {
        assert!(MessageId::new(2) > MessageId::new(1));
        assert_eq!(MessageId::new(7).to_string(), "7");
    }

    #[test]
    fn test_author_serialization() {
        assert_eq!(serde_json::to_string(&Author::Assistant).unwrap(), "\"assistant\"");
        let msg = Message::assistant("hi");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["author"], "assistant");
        assert_eq!(json["id"], 0);
    }
}
