//! Page Tree
//!
//! An in-process model of a rendered, externally owned UI tree, with the
//! host facilities a mirroring layer depends on.
//!
//! # Features
//!
//! - **Arena nodes**: elements with attributes and properties, text nodes
//! - **Structural lookup**: CSS selectors compiled by `scraper`/`selectors`, matched in document order
//! - **Mutation observers**: per-node attribute and child-list records, delivered in batches
//! - **Events**: synchronous, bubbling dispatch of media, form, pointer and keyboard events
//!
//! # Quick Start
//!
//! ```rust
//! use page_tree::{Document, ElementSpec, ObserveOptions, Selector};
//! use std::sync::{Arc, Mutex};
//!
//! let doc = Document::new();
//! doc.insert(doc.root(), ElementSpec::new("div").id("volume-slider").attr("value", "40"));
//!
//! let slider = doc.query_selector(&Selector::parse("#volume-slider").unwrap()).unwrap();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let seen_cb = Arc::clone(&seen);
//! doc.observe(slider, ObserveOptions::attribute("value"), move |records, doc| {
//!     for record in records {
//!         seen_cb.lock().unwrap().push(doc.attribute(record.target, "value"));
//!     }
//! });
//!
//! doc.set_attribute(slider, "value", "55");
//! assert!(seen.lock().unwrap().is_empty()); // delivery is deferred
//! doc.flush();
//! assert_eq!(*seen.lock().unwrap(), vec![Some("55".to_string())]);
//! ```
//!
//! # Architecture
//!
//! ```text
//! Document (Arc<Mutex<DocumentInner>>)
//!     │
//!     ├── nodes: Vec<NodeData>            (arena, NodeId = index)
//!     ├── observers: BTreeMap<id, ObserverEntry>
//!     │       └── pending: Vec<MutationRecord>  ── flush() ──► callback(batch)
//!     └── listeners: BTreeMap<id, ListenerEntry>
//!             └── dispatch_event() ──► callback(event)  (synchronous, bubbling)
//! ```

// Modules
pub mod builder;
pub mod document;
pub mod error;
pub mod event;
pub mod node;
pub mod observer;
pub mod selector;

// Re-exports - Public API
pub use builder::ElementSpec;
pub use document::Document;
pub use error::SelectorError;
pub use event::{Event, EventType, ListenerHandle};
pub use node::NodeId;
pub use observer::{MutationKind, MutationRecord, ObserveOptions, ObserverHandle};
pub use selector::Selector;
