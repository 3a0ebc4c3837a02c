//! Ordered, append-only conversation history.
//!
//! All mutations go through one lock, so concurrent `update_text` calls for
//! the same message serialize and the last one applied wins. Every completed
//! mutation bumps a revision published on a `watch` channel; renderers
//! subscribe to it and re-read [`MessageStore::snapshot`].

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::watch;

use crate::error::StoreError;
use crate::models::{Message, MessageId};

#[derive(Debug, Default)]
struct Inner {
    messages: Vec<Message>,
    /// id -> position; positions never change because the list only grows
    index: HashMap<MessageId, usize>,
    next_id: u64,
    closed: bool,
}

#[derive(Debug)]
pub struct MessageStore {
    inner: RwLock<Inner>,
    revision: watch::Sender<u64>,
}

impl MessageStore {
    pub fn new() -> Self {
        let (revision, _rx) = watch::channel(0);
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                ..Default::default()
            }),
            revision,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    /// Add a message at the tail and return its newly assigned id.
    pub fn append(&self, mut message: Message) -> Result<MessageId, StoreError> {
        let id = {
            let mut inner = self.write();
            if inner.closed {
                return Err(StoreError::Closed);
            }
            let id = MessageId::new(inner.next_id);
            inner.next_id += 1;
            message.id = id;
            let position = inner.messages.len();
            inner.messages.push(message);
            inner.index.insert(id, position);
            id
        };
        self.bump();
        Ok(id)
    }

    /// Replace the text of a streaming message.
    pub fn update_text(&self, id: MessageId, text: impl Into<String>) -> Result<(), StoreError> {
        {
            let mut inner = self.write();
            if inner.closed {
                return Err(StoreError::Closed);
            }
            let position = *inner.index.get(&id).ok_or(StoreError::NotFound(id))?;
            let message = &mut inner.messages[position];
            if !message.is_streaming {
                return Err(StoreError::Finalized(id));
            }
            message.text = text.into();
        }
        self.bump();
        Ok(())
    }

    /// Freeze a message's text. Finalizing twice is a no-op.
    pub fn finalize(&self, id: MessageId) -> Result<(), StoreError> {
        let changed = {
            let mut inner = self.write();
            if inner.closed {
                return Err(StoreError::Closed);
            }
            let position = *inner.index.get(&id).ok_or(StoreError::NotFound(id))?;
            std::mem::replace(&mut inner.messages[position].is_streaming, false)
        };
        if changed {
            self.bump();
        }
        Ok(())
    }

    /// Ordered copy of the history.
    pub fn snapshot(&self) -> Vec<Message> {
        self.read().messages.clone()
    }

    pub fn get(&self, id: MessageId) -> Option<Message> {
        let inner = self.read();
        inner
            .index
            .get(&id)
            .map(|&position| inner.messages[position].clone())
    }

    pub fn last(&self) -> Option<Message> {
        self.read().messages.last().cloned()
    }

    pub fn len(&self) -> usize {
        self.read().messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().messages.is_empty()
    }

    /// Current revision. Changes whenever a mutation completes.
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Reject all further mutations. Reads keep working.
    pub fn close(&self) {
        self.write().closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.read().closed
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Author;
    use std::sync::Arc;

    #[test]
    fn test_append_preserves_order_and_assigns_increasing_ids() {
        let store = MessageStore::new();
        let texts = ["first", "second", "third", "fourth"];
        let ids: Vec<MessageId> = texts
            .iter()
            .map(|t| store.append(Message::user(*t, false)).unwrap())
            .collect();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), texts.len());
        for (i, message) in snapshot.iter().enumerate() {
            assert_eq!(message.text, texts[i]);
            assert_eq!(message.id, ids[i]);
        }
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_update_text_last_write_wins() {
        let store = MessageStore::new();
        let id = store.append(Message::assistant_placeholder()).unwrap();
        store.update_text(id, "t1").unwrap();
        store.update_text(id, "t2").unwrap();
        assert_eq!(store.get(id).unwrap().text, "t2");
    }

    #[test]
    fn test_update_text_does_not_touch_other_fields_or_order() {
        let store = MessageStore::new();
        let user = store.append(Message::user("q", true)).unwrap();
        let reply = store.append(Message::assistant_placeholder()).unwrap();
        let before = store.get(reply).unwrap();

        store.update_text(reply, "answer").unwrap();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].id, user);
        assert_eq!(snapshot[1].id, reply);
        assert_eq!(snapshot[1].author, Author::Assistant);
        assert_eq!(snapshot[1].created_at, before.created_at);
        assert!(snapshot[1].is_streaming);
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let store = MessageStore::new();
        let err = store.update_text(MessageId::new(99), "x").unwrap_err();
        assert_eq!(err, StoreError::NotFound(MessageId::new(99)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_finalized_message_is_immutable() {
        let store = MessageStore::new();
        let id = store.append(Message::assistant_placeholder()).unwrap();
        store.update_text(id, "done").unwrap();
        store.finalize(id).unwrap();

        assert_eq!(store.update_text(id, "late"), Err(StoreError::Finalized(id)));
        assert_eq!(store.get(id).unwrap().text, "done");
        assert!(!store.get(id).unwrap().is_streaming);
    }

    #[test]
    fn test_complete_messages_reject_updates() {
        let store = MessageStore::new();
        let id = store.append(Message::assistant("greeting")).unwrap();
        assert_eq!(store.update_text(id, "x"), Err(StoreError::Finalized(id)));
    }

    #[test]
    fn test_snapshot_idempotent() {
        let store = MessageStore::new();
        store.append(Message::user("a", false)).unwrap();
        store.append(Message::assistant("b")).unwrap();
        assert_eq!(store.snapshot(), store.snapshot());
    }

    #[test]
    fn test_revision_bumps_on_mutation() {
        let store = MessageStore::new();
        let mut rx = store.subscribe();
        assert_eq!(store.revision(), 0);

        let id = store.append(Message::assistant_placeholder()).unwrap();
        assert!(rx.has_changed().unwrap());
        let _ = rx.borrow_and_update();

        store.update_text(id, "x").unwrap();
        assert_eq!(store.revision(), 2);
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn test_closed_store_rejects_mutations() {
        let store = MessageStore::new();
        let id = store.append(Message::assistant_placeholder()).unwrap();
        store.close();

        assert_eq!(store.update_text(id, "x"), Err(StoreError::Closed));
        assert_eq!(
            store.append(Message::assistant("y")),
            Err(StoreError::Closed)
        );
        assert_eq!(store.len(), 1);
        assert!(store.is_closed());
    }

    #[test]
    fn test_concurrent_updates_never_tear() {
        let store = Arc::new(MessageStore::new());
        let id = store.append(Message::assistant_placeholder()).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|n| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let text = n.to_string().repeat(256);
                    for _ in 0..50 {
                        store.update_text(id, text.clone()).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let text = store.get(id).unwrap().text;
        assert_eq!(text.len(), 256);
        let first = text.chars().next().unwrap();
        assert!(text.chars().all(|c| c == first));
        assert_eq!(store.len(), 1);
    }
}
