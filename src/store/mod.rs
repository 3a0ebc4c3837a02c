//! Message store for a chat session.

mod message_store;

pub use message_store::MessageStore;
