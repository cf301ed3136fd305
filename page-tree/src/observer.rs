//! Mutation observers
//!
//! Observers record mutations on a single target node. Records are queued
//! per observer and only delivered when the document is flushed, so a
//! callback routinely receives several records at once.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::document::{Document, DocumentInner};
use crate::node::NodeId;

/// What an observer wants to hear about
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObserveOptions {
    /// Record attribute changes
    pub attributes: bool,
    /// Restrict attribute records to these names (`None` = all attributes)
    pub attribute_filter: Option<Vec<String>>,
    /// Record insertion and removal of direct children
    pub child_list: bool,
}

impl ObserveOptions {
    /// Observe a single attribute
    pub fn attribute(name: &str) -> Self {
        Self {
            attributes: true,
            attribute_filter: Some(vec![name.to_string()]),
            child_list: false,
        }
    }

    /// Observe direct child insertion/removal
    pub fn child_list() -> Self {
        Self {
            child_list: true,
            ..Default::default()
        }
    }

    pub(crate) fn wants_attribute(&self, name: &str) -> bool {
        self.attributes
            && self
                .attribute_filter
                .as_ref()
                .map_or(true, |filter| filter.iter().any(|n| n == name))
    }
}

/// The kind of change a record describes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    /// An attribute was set or removed; `old_value` is its value before the change
    Attributes {
        name: String,
        old_value: Option<String>,
    },
    /// Direct children were inserted and/or removed
    ChildList {
        added: Vec<NodeId>,
        removed: Vec<NodeId>,
    },
}

/// A single observed mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    /// The observed node the mutation happened on
    pub target: NodeId,
    pub kind: MutationKind,
}

impl MutationRecord {
    /// Attribute name for attribute records
    pub fn attribute_name(&self) -> Option<&str> {
        match &self.kind {
            MutationKind::Attributes { name, .. } => Some(name),
            MutationKind::ChildList { .. } => None,
        }
    }

    /// Previous attribute value for attribute records
    pub fn old_value(&self) -> Option<&str> {
        match &self.kind {
            MutationKind::Attributes { old_value, .. } => old_value.as_deref(),
            MutationKind::ChildList { .. } => None,
        }
    }
}

/// Callback invoked with one delivered batch of records
pub type MutationCallback = Arc<dyn Fn(&[MutationRecord], &Document) + Send + Sync>;

pub(crate) struct ObserverEntry {
    pub target: NodeId,
    pub options: ObserveOptions,
    pub callback: MutationCallback,
    pub pending: Vec<MutationRecord>,
}

/// Handle to a registered observer
///
/// Dropping the handle does not disconnect; call [`ObserverHandle::disconnect`].
#[derive(Clone)]
pub struct ObserverHandle {
    pub(crate) id: u64,
    pub(crate) target: NodeId,
    pub(crate) doc: Weak<Mutex<DocumentInner>>,
}

impl ObserverHandle {
    /// Stop observing and discard any records not yet delivered
    ///
    /// Returns `false` if the observer was already disconnected.
    pub fn disconnect(&self) -> bool {
        match self.doc.upgrade() {
            Some(inner) => inner.lock().observers.remove(&self.id).is_some(),
            None => false,
        }
    }

    /// Whether the observer is still registered
    pub fn is_connected(&self) -> bool {
        self.doc
            .upgrade()
            .is_some_and(|inner| inner.lock().observers.contains_key(&self.id))
    }
}

impl std::fmt::Debug for ObserverHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverHandle")
            .field("id", &self.id)
            .field("target", &self.target)
            .finish()
    }
}
