//! Expanded/collapsed state of the conversation history.
//!
//! The UI layer owns a [`VisibilityState`]; the session only asks it to
//! expand after a send. Message content never drives a transition, so a
//! reply that keeps growing does not make the panel flicker.

use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Collapsed,
    Expanded,
}

/// Things that can move the history between collapsed and expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityEvent {
    /// Click or tap outside the chat container.
    OutsideInteraction,
    /// A message was accepted for sending.
    SendSucceeded,
    /// The input field gained focus.
    InputFocused { has_messages: bool },
}

impl Visibility {
    /// Transition function.
    pub fn next(self, event: VisibilityEvent) -> Visibility {
        match (self, event) {
            (Visibility::Expanded, VisibilityEvent::OutsideInteraction) => Visibility::Collapsed,
            (_, VisibilityEvent::SendSucceeded) => Visibility::Expanded,
            (_, VisibilityEvent::InputFocused { has_messages: true }) => Visibility::Expanded,
            (state, _) => state,
        }
    }

    pub fn is_expanded(self) -> bool {
        self == Visibility::Expanded
    }
}

/// Shared, observable visibility. Subscribers only wake on actual changes.
#[derive(Debug)]
pub struct VisibilityState {
    tx: watch::Sender<Visibility>,
}

impl VisibilityState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Visibility::Collapsed);
        Self { tx }
    }

    pub fn current(&self) -> Visibility {
        *self.tx.borrow()
    }

    /// Apply an event and return the resulting state.
    pub fn apply(&self, event: VisibilityEvent) -> Visibility {
        let mut result = Visibility::Collapsed;
        self.tx.send_if_modified(|state| {
            let next = state.next(event);
            result = next;
            if next != *state {
                tracing::debug!(from = ?*state, to = ?next, ?event, "visibility changed");
                *state = next;
                true
            } else {
                false
            }
        });
        result
    }

    pub fn on_outside_interaction(&self) -> Visibility {
        self.apply(VisibilityEvent::OutsideInteraction)
    }

    pub fn on_send(&self) -> Visibility {
        self.apply(VisibilityEvent::SendSucceeded)
    }

    pub fn on_input_focus(&self, has_messages: bool) -> Visibility {
        self.apply(VisibilityEvent::InputFocused { has_messages })
    }

    pub fn subscribe(&self) -> watch::Receiver<Visibility> {
        self.tx.subscribe()
    }
}

impl Default for VisibilityState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_collapsed() {
        assert_eq!(VisibilityState::new().current(), Visibility::Collapsed);
    }

    #[test]
    fn test_send_forces_expanded_from_any_state() {
        for start in [Visibility::Collapsed, Visibility::Expanded] {
            assert_eq!(start.next(VisibilityEvent::SendSucceeded), Visibility::Expanded);
        }
    }

    #[test]
    fn test_outside_interaction_collapses_only_when_expanded() {
        assert_eq!(
            Visibility::Expanded.next(VisibilityEvent::OutsideInteraction),
            Visibility::Collapsed
        );
        assert_eq!(
            Visibility::Collapsed.next(VisibilityEvent::OutsideInteraction),
            Visibility::Collapsed
        );
    }

    #[test]
    fn test_focus_expands_only_with_messages() {
        let state = VisibilityState::new();
        assert_eq!(state.on_input_focus(false), Visibility::Collapsed);
        assert_eq!(state.on_input_focus(true), Visibility::Expanded);
        // focus never collapses
        assert_eq!(state.on_input_focus(false), Visibility::Expanded);
    }

    #[test]
    fn test_subscribers_not_notified_without_change() {
        let state = VisibilityState::new();
        let mut rx = state.subscribe();

        state.on_outside_interaction();
        assert!(!rx.has_changed().unwrap());

        state.on_send();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), Visibility::Expanded);

        state.on_send();
        assert!(!rx.has_changed().unwrap());

        state.on_outside_interaction();
        assert_eq!(*rx.borrow_and_update(), Visibility::Collapsed);
    }
}
