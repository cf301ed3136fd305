//! Blocking iterator over bus emissions
//!
//! Provides various iteration patterns for consuming change events:
//! - Blocking: `recv()`, `for event in iter`
//! - Non-blocking: `try_recv()`, `try_iter()`
//! - Timeout: `recv_timeout()`, `timeout_iter()`

use std::sync::mpsc;
use std::time::Duration;

use crate::event::ChangeEvent;
use crate::subscription::Subscription;

/// Blocking iterator over change events
///
/// Created by `EventBus::iter()`, which feeds it from a wildcard
/// subscription. Dropping the iterator removes that subscription.
///
/// # Example
///
/// ```rust,ignore
/// // Blocking iteration
/// for event in bus.iter() {
///     println!("{} changed", event.key);
/// }
///
/// // Non-blocking check
/// for event in bus.iter().try_iter() {
///     println!("{} changed", event.key);
/// }
///
/// // With timeout
/// if let Some(event) = bus.iter().recv_timeout(Duration::from_secs(1)) {
///     println!("Got event: {:?}", event);
/// }
/// ```
pub struct ChangeIterator<V> {
    rx: mpsc::Receiver<ChangeEvent<V>>,
    subscription: Option<Subscription>,
}

impl<V> ChangeIterator<V> {
    /// Create a new ChangeIterator from a receiver and the subscription feeding it
    pub(crate) fn new(rx: mpsc::Receiver<ChangeEvent<V>>, subscription: Option<Subscription>) -> Self {
        Self { rx, subscription }
    }

    /// Block until the next event is available
    ///
    /// Returns `None` if the channel is closed.
    pub fn recv(&self) -> Option<ChangeEvent<V>> {
        self.rx.recv().ok()
    }

    /// Block until the next event or timeout expires
    ///
    /// Returns `None` if the timeout expires or channel is closed.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ChangeEvent<V>> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Try to receive an event without blocking
    pub fn try_recv(&self) -> Option<ChangeEvent<V>> {
        self.rx.try_recv().ok()
    }

    /// Non-blocking iterator over currently queued events
    pub fn try_iter(&self) -> TryIter<'_, V> {
        TryIter { inner: self }
    }

    /// Iterator that blocks for up to `timeout` per item
    ///
    /// Stops when a timeout expires without an event.
    pub fn timeout_iter(&self, timeout: Duration) -> TimeoutIter<'_, V> {
        TimeoutIter {
            inner: self,
            timeout,
        }
    }
}

impl<V> Iterator for ChangeIterator<V> {
    type Item = ChangeEvent<V>;

    /// Block until the next change event
    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}

impl<V> Drop for ChangeIterator<V> {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

/// Non-blocking iterator over currently available events
pub struct TryIter<'a, V> {
    inner: &'a ChangeIterator<V>,
}

impl<'a, V> Iterator for TryIter<'a, V> {
    type Item = ChangeEvent<V>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.try_recv()
    }
}

/// Blocking iterator with timeout
pub struct TimeoutIter<'a, V> {
    inner: &'a ChangeIterator<V>,
    timeout: Duration,
}

impl<'a, V> Iterator for TimeoutIter<'a, V> {
    type Item = ChangeEvent<V>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.recv_timeout(self.timeout)
    }
}
