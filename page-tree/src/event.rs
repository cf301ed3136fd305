//! Host events and listeners
//!
//! Events are dispatched synchronously: every matching listener runs before
//! `dispatch_event` returns. Dispatch bubbles from the target up to the
//! document root.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::document::{Document, DocumentInner};
use crate::node::NodeId;

/// Event types the player bar reacts to or emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Media element started playing
    Play,
    /// Media element paused
    Pause,
    /// Form control value changed
    Change,
    /// Pointer activation
    Click,
    /// Keyboard key pressed
    KeyDown,
}

/// A dispatched event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub event_type: EventType,
    /// Key identifier for `KeyDown` events
    pub key: Option<String>,
}

impl Event {
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            key: None,
        }
    }

    pub fn key_down(key: impl Into<String>) -> Self {
        Self {
            event_type: EventType::KeyDown,
            key: Some(key.into()),
        }
    }
}

/// Listener callback; receives the event and the node it was dispatched on
pub type EventCallback = Arc<dyn Fn(&Event, NodeId, &Document) + Send + Sync>;

pub(crate) struct ListenerEntry {
    pub target: NodeId,
    pub event_type: EventType,
    pub callback: EventCallback,
}

/// Handle to a registered listener
#[derive(Clone)]
pub struct ListenerHandle {
    pub(crate) id: u64,
    pub(crate) doc: Weak<Mutex<DocumentInner>>,
}

impl ListenerHandle {
    /// Remove the listener. Returns `false` if it was already removed.
    pub fn remove(&self) -> bool {
        match self.doc.upgrade() {
            Some(inner) => inner.lock().listeners.remove(&self.id).is_some(),
            None => false,
        }
    }
}

impl std::fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerHandle").field("id", &self.id).finish()
    }
}
