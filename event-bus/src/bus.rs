//! Keyed publish/subscribe bus
//!
//! `EventBus<V>` maps keys to insertion-ordered callback lists. Emitting a
//! key runs that key's callbacks and then the wildcard (`"all"`) callbacks,
//! synchronously, on the emitting thread.

use std::collections::HashMap;
use std::sync::{mpsc, Arc};

use parking_lot::Mutex;
use tracing::trace;

use crate::event::{ChangeEvent, WILDCARD};
use crate::iter::ChangeIterator;
use crate::subscription::{SubscriberRegistry, Subscription};

/// Subscriber callback
pub type Callback<V> = Arc<dyn Fn(&ChangeEvent<V>) + Send + Sync>;

struct Subscriber<V> {
    id: u64,
    callback: Callback<V>,
}

struct BusInner<V> {
    next_id: u64,
    channels: HashMap<String, Vec<Subscriber<V>>>,
}

impl<V> BusInner<V> {
    fn callbacks(&self, key: &str) -> impl Iterator<Item = Callback<V>> + '_ {
        self.channels
            .get(key)
            .into_iter()
            .flatten()
            .map(|s| Arc::clone(&s.callback))
    }
}

impl<V: 'static> SubscriberRegistry for Mutex<BusInner<V>> {
    fn remove(&self, key: &str, id: u64) -> bool {
        let mut inner = self.lock();
        let Some(subscribers) = inner.channels.get_mut(key) else {
            return false;
        };
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        let removed = subscribers.len() != before;
        if subscribers.is_empty() {
            inner.channels.remove(key);
        }
        removed
    }

    fn contains(&self, key: &str, id: u64) -> bool {
        self.lock()
            .channels
            .get(key)
            .is_some_and(|subscribers| subscribers.iter().any(|s| s.id == id))
    }
}

/// Publish/subscribe bus keyed by name, with a wildcard channel
///
/// Clones share the same subscriber lists.
///
/// # Example
///
/// ```rust
/// use event_bus::EventBus;
/// use std::sync::{Arc, Mutex};
///
/// let bus = EventBus::<u8>::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let seen_all = Arc::clone(&seen);
/// bus.subscribe("all", move |event| seen_all.lock().unwrap().push((event.key, event.value)));
///
/// let sub = bus.subscribe("volume", |event| assert_eq!(event.value, 55));
/// bus.emit("volume", 55);
/// sub.unsubscribe();
///
/// assert_eq!(*seen.lock().unwrap(), vec![("volume", 55)]);
/// ```
pub struct EventBus<V> {
    inner: Arc<Mutex<BusInner<V>>>,
}

impl<V> EventBus<V>
where
    V: Clone + Send + 'static,
{
    /// Create a bus with no subscribers
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(BusInner {
                next_id: 0,
                channels: HashMap::new(),
            })),
        }
    }

    /// Register a callback for `key`, or for every emission if `key` is `"all"`
    ///
    /// Callbacks run in registration order.
    pub fn subscribe<F>(&self, key: &str, callback: F) -> Subscription
    where
        F: Fn(&ChangeEvent<V>) + Send + Sync + 'static,
    {
        let id = {
            let mut inner = self.inner.lock();
            inner.next_id += 1;
            let id = inner.next_id;
            inner.channels.entry(key.to_string()).or_default().push(Subscriber {
                id,
                callback: Arc::new(callback),
            });
            id
        };

        let inner: Arc<dyn SubscriberRegistry> = self.inner.clone();
        Subscription::new(key.to_string(), id, Arc::downgrade(&inner))
    }

    /// Register a callback on the wildcard channel
    pub fn subscribe_all<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&ChangeEvent<V>) + Send + Sync + 'static,
    {
        self.subscribe(WILDCARD, callback)
    }

    /// Deliver `value` to the subscribers of `key`, then to the wildcard subscribers
    ///
    /// Subscriber lists are snapshotted first: callbacks added or removed
    /// during delivery take effect from the next emission. Returns the number
    /// of callbacks invoked.
    pub fn emit(&self, key: &'static str, value: V) -> usize {
        let event = ChangeEvent::new(key, value);

        let callbacks: Vec<Callback<V>> = {
            let inner = self.inner.lock();
            let mut callbacks: Vec<Callback<V>> = inner.callbacks(key).collect();
            if key != WILDCARD {
                callbacks.extend(inner.callbacks(WILDCARD));
            }
            callbacks
        };

        trace!(key, subscribers = callbacks.len(), "emit");
        for callback in &callbacks {
            callback(&event);
        }
        callbacks.len()
    }

    /// Number of callbacks registered directly on `key`
    pub fn subscriber_count(&self, key: &str) -> usize {
        self.inner.lock().channels.get(key).map_or(0, Vec::len)
    }

    /// Blocking iterator over every emission from now on
    ///
    /// Backed by a wildcard subscription that is removed when the iterator
    /// is dropped.
    pub fn iter(&self) -> ChangeIterator<V> {
        let (tx, rx) = mpsc::channel();
        let subscription = self.subscribe_all(move |event| {
            let _ = tx.send(event.clone());
        });
        ChangeIterator::new(rx, Some(subscription))
    }

    /// Remove every subscriber
    pub fn clear(&self) {
        self.inner.lock().channels.clear();
    }
}

impl<V> Default for EventBus<V>
where
    V: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for EventBus<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> std::fmt::Debug for EventBus<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        let mut keys: Vec<&String> = inner.channels.keys().collect();
        keys.sort();
        f.debug_struct("EventBus").field("keys", &keys).finish()
    }
}
