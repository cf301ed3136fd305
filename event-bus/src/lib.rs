//! Event Bus
//!
//! A small, generic publish/subscribe bus keyed by name, with a wildcard
//! channel that observes every emission.
//!
//! # Features
//!
//! - **Keyed channels**: subscribe to the changes of one key
//! - **Wildcard channel**: subscribe to `"all"` to receive every emission with its key
//! - **Ordered, synchronous delivery**: callbacks run in registration order on the emitting thread
//! - **Disposable subscriptions**: `subscribe` returns a handle with `unsubscribe()`
//! - **Blocking Iteration**: consume emissions via `iter()`
//!
//! # Quick Start
//!
//! ```rust
//! use event_bus::{EventBus, WILDCARD};
//!
//! let bus = EventBus::<String>::new();
//!
//! let title = bus.subscribe("title", |event| println!("title is now {}", event.value));
//! let iter = bus.iter();
//!
//! bus.emit("title", "Song".to_string());
//!
//! let event = iter.try_recv().unwrap();
//! assert_eq!(event.key, "title");
//! assert_eq!(bus.subscriber_count(WILDCARD), 1);
//!
//! title.unsubscribe();
//! ```
//!
//! # Architecture
//!
//! ```text
//! EventBus<V>
//!     │
//!     └── channels: HashMap<key, Vec<Subscriber>>
//!             │
//!             ├── "volume" ──► [cb, cb]     emit("volume", v) runs these,
//!             └── "all"    ──► [cb, tx]     then these (tx feeds ChangeIterator<V>)
//! ```

// Modules
pub mod bus;
pub mod event;
pub mod iter;
pub mod subscription;

// Re-exports - Public API
pub use bus::{Callback, EventBus};
pub use event::{ChangeEvent, WILDCARD};
pub use iter::{ChangeIterator, TimeoutIter, TryIter};
pub use subscription::Subscription;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::bus::EventBus;
    pub use crate::event::{ChangeEvent, WILDCARD};
    pub use crate::iter::ChangeIterator;
    pub use crate::subscription::Subscription;
}
