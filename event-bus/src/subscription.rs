//! Disposable subscription handles

use std::sync::Weak;

/// Bookkeeping side of a bus, seen through a type-erased handle
pub(crate) trait SubscriberRegistry: Send + Sync {
    fn remove(&self, key: &str, id: u64) -> bool;
    fn contains(&self, key: &str, id: u64) -> bool;
}

/// Handle returned by `EventBus::subscribe`
///
/// Dropping the handle leaves the callback registered; call
/// [`Subscription::unsubscribe`] to dispose of it.
#[derive(Clone)]
pub struct Subscription {
    key: String,
    id: u64,
    registry: Weak<dyn SubscriberRegistry>,
}

impl Subscription {
    pub(crate) fn new(key: String, id: u64, registry: Weak<dyn SubscriberRegistry>) -> Self {
        Self { key, id, registry }
    }

    /// Remove the callback from the bus
    ///
    /// Returns `false` if it had already been removed or the bus is gone.
    pub fn unsubscribe(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.remove(&self.key, self.id))
    }

    /// Whether the callback is still registered
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.contains(&self.key, self.id))
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("id", &self.id)
            .finish()
    }
}
