//! Change events delivered by the bus
//!
//! Every emission reaches subscribers as a `ChangeEvent` carrying the key
//! that was emitted and the new value. Wildcard subscribers see the same
//! event, so they can tell which key changed.

use std::time::Instant;

use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Reserved key whose subscribers receive every emission
pub const WILDCARD: &str = "all";

/// A single emitted change
///
/// # Example
///
/// ```rust
/// use event_bus::ChangeEvent;
///
/// let event = ChangeEvent::new("volume", 55u8);
/// assert_eq!(event.key, "volume");
/// assert_eq!(event.value, 55);
/// ```
#[derive(Debug, Clone)]
pub struct ChangeEvent<V> {
    /// The key that was emitted
    pub key: &'static str,

    /// The new value
    pub value: V,

    /// When the change was emitted
    pub timestamp: Instant,
}

impl<V> ChangeEvent<V> {
    /// Create a new change event stamped with the current time
    pub fn new(key: &'static str, value: V) -> Self {
        Self {
            key,
            value,
            timestamp: Instant::now(),
        }
    }
}

impl<V: PartialEq> PartialEq for ChangeEvent<V> {
    fn eq(&self, other: &Self) -> bool {
        // Timestamp not included in equality
        self.key == other.key && self.value == other.value
    }
}

/// Serializes as `{"key": ..., "value": ...}`
impl<V: Serialize> Serialize for ChangeEvent<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ChangeEvent", 2)?;
        state.serialize_field("key", self.key)?;
        state.serialize_field("value", &self.value)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_event_creation() {
        let event = ChangeEvent::new("title", "Song".to_string());

        assert_eq!(event.key, "title");
        assert_eq!(event.value, "Song");
    }

    #[test]
    fn test_change_event_equality() {
        let event1 = ChangeEvent::new("volume", 40);
        let event2 = ChangeEvent::new("volume", 40);
        let event3 = ChangeEvent::new("volume", 55);
        let event4 = ChangeEvent::new("position", 40);

        // Same key and value, different timestamps
        assert_eq!(event1, event2);

        // Different value
        assert_ne!(event1, event3);

        // Different key
        assert_ne!(event1, event4);
    }

    #[test]
    fn test_serializes_key_and_value() {
        let event = ChangeEvent::new("volume", 55);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json, serde_json::json!({ "key": "volume", "value": 55 }));
    }
}
