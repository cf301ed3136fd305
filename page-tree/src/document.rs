//! The shared document handle
//!
//! A `Document` is a cheap-to-clone handle over one tree instance. All
//! bookkeeping happens under a single `parking_lot::Mutex`, which is never
//! held while observer or listener callbacks run. Callbacks are therefore
//! free to read the tree, mutate it, and (dis)connect observers.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{trace, warn};

use crate::builder::ElementSpec;
use crate::event::{Event, EventCallback, EventType, ListenerEntry, ListenerHandle};
use crate::node::{ElementData, NodeData, NodeId, NodeKind};
use crate::observer::{
    MutationCallback, MutationKind, MutationRecord, ObserveOptions, ObserverEntry, ObserverHandle,
};
use crate::selector::Selector;

/// Tag of the root node; selectors never match it
pub const ROOT_TAG: &str = "#document";

/// Upper bound on delivery rounds within one `flush`
const MAX_FLUSH_ROUNDS: usize = 1024;

pub(crate) struct DocumentInner {
    pub nodes: Vec<NodeData>,
    pub observers: BTreeMap<u64, ObserverEntry>,
    pub listeners: BTreeMap<u64, ListenerEntry>,
    next_handle: u64,
}

impl DocumentInner {
    fn new() -> Self {
        Self {
            nodes: vec![NodeData::element(ElementData::new(ROOT_TAG))],
            observers: BTreeMap::new(),
            listeners: BTreeMap::new(),
            next_handle: 0,
        }
    }

    fn next_handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0)
    }

    fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.node(id)?.as_element()
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.nodes.get_mut(id.0)?.as_element_mut()
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(data);
        NodeId(self.nodes.len() - 1)
    }

    fn record(&mut self, target: NodeId, kind: MutationKind) {
        for entry in self.observers.values_mut() {
            if entry.target != target {
                continue;
            }
            let wanted = match &kind {
                MutationKind::Attributes { name, .. } => entry.options.wants_attribute(name),
                MutationKind::ChildList { .. } => entry.options.child_list,
            };
            if wanted {
                entry.pending.push(MutationRecord {
                    target,
                    kind: kind.clone(),
                });
            }
        }
    }

    /// Unlink a node from its parent without recording anything
    fn unlink(&mut self, child: NodeId) -> Option<NodeId> {
        let parent = self.nodes[child.0].parent.take()?;
        self.nodes[parent.0].children.retain(|c| *c != child);
        Some(parent)
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes[id.0].parent;
        }
        false
    }

    fn can_append(&self, parent: NodeId, child: NodeId) -> bool {
        self.element(parent).is_some()
            && self.node(child).is_some()
            && child != NodeId::ROOT
            && !self.is_inclusive_ancestor(child, parent)
    }

    fn append(&mut self, parent: NodeId, child: NodeId) {
        if let Some(old_parent) = self.unlink(child) {
            self.record(
                old_parent,
                MutationKind::ChildList {
                    added: vec![],
                    removed: vec![child],
                },
            );
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn instantiate(&mut self, spec: ElementSpec) -> NodeId {
        let mut data = ElementData::new(spec.tag);
        data.attributes = spec.attributes;
        data.properties = spec.properties.into_iter().collect();
        let id = self.push(NodeData::element(data));

        if let Some(text) = spec.text {
            let text_id = self.push(NodeData::text(text));
            self.nodes[text_id.0].parent = Some(id);
            self.nodes[id.0].children.push(text_id);
        }
        for child_spec in spec.children {
            let child = self.instantiate(child_spec);
            self.nodes[child.0].parent = Some(id);
            self.nodes[id.0].children.push(child);
        }
        id
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id.0].kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element(_) => {
                for child in &self.nodes[id.0].children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    /// Elements matching `selector`, in document order
    fn select(&self, selector: &Selector, first_only: bool) -> Vec<NodeId> {
        selector.select(&self.nodes, first_only)
    }
}

/// Shared handle to a page tree
///
/// Clones share the same tree, observers and listeners.
///
/// Nodes are never freed. A detached subtree keeps its arena slots for the
/// life of the document, so a page that rebuilds a row on every track change
/// grows the arena by that row each time.
#[derive(Clone)]
pub struct Document {
    inner: Arc<Mutex<DocumentInner>>,
}

impl Document {
    /// Create an empty document containing only the root node
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(DocumentInner::new())),
        }
    }

    /// The root node; keyboard input is dispatched here
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Create a detached element
    pub fn create_element(&self, tag: impl Into<String>) -> NodeId {
        self.inner.lock().push(NodeData::element(ElementData::new(tag)))
    }

    /// Create a detached text node
    pub fn create_text(&self, text: impl Into<String>) -> NodeId {
        self.inner.lock().push(NodeData::text(text))
    }

    /// Build a detached subtree from a spec
    pub fn instantiate(&self, spec: ElementSpec) -> NodeId {
        self.inner.lock().instantiate(spec)
    }

    /// Build a subtree and append it to `parent`
    ///
    /// Returns `None` (and builds nothing) if `parent` is not an element.
    pub fn insert(&self, parent: NodeId, spec: ElementSpec) -> Option<NodeId> {
        let mut inner = self.inner.lock();
        inner.element(parent)?;
        let id = inner.instantiate(spec);
        inner.append(parent, id);
        inner.record(
            parent,
            MutationKind::ChildList {
                added: vec![id],
                removed: vec![],
            },
        );
        Some(id)
    }

    // ========================================================================
    // Structure
    // ========================================================================

    /// Append `child` to `parent`, moving it if it is already attached
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> bool {
        let mut inner = self.inner.lock();
        if !inner.can_append(parent, child) {
            return false;
        }
        inner.append(parent, child);
        inner.record(
            parent,
            MutationKind::ChildList {
                added: vec![child],
                removed: vec![],
            },
        );
        true
    }

    /// Remove `child` from `parent`; `false` if it is not a child of `parent`
    pub fn remove_child(&self, parent: NodeId, child: NodeId) -> bool {
        let mut inner = self.inner.lock();
        if inner.node(child).and_then(|n| n.parent) != Some(parent) {
            return false;
        }
        inner.unlink(child);
        inner.record(
            parent,
            MutationKind::ChildList {
                added: vec![],
                removed: vec![child],
            },
        );
        true
    }

    /// Detach a node from wherever it is attached
    pub fn remove(&self, node: NodeId) -> bool {
        match self.parent(node) {
            Some(parent) => self.remove_child(parent, node),
            None => false,
        }
    }

    /// Replace every child of `parent` with `children`, as one mutation
    pub fn replace_children(&self, parent: NodeId, children: &[NodeId]) -> bool {
        let mut inner = self.inner.lock();
        if inner.element(parent).is_none() || children.iter().any(|c| !inner.can_append(parent, *c)) {
            return false;
        }

        let removed: Vec<NodeId> = inner.nodes[parent.0].children.clone();
        for child in &removed {
            inner.unlink(*child);
        }
        for child in children {
            inner.append(parent, *child);
        }
        inner.record(
            parent,
            MutationKind::ChildList {
                added: children.to_vec(),
                removed,
            },
        );
        true
    }

    /// Replace an element's children with a single text node
    ///
    /// An empty string leaves the element without children. Either way one
    /// child-list record is produced.
    pub fn set_text_content(&self, node: NodeId, text: impl Into<String>) -> bool {
        let text = text.into();
        let mut inner = self.inner.lock();
        let is_element = match inner.node(node) {
            Some(data) => matches!(data.kind, NodeKind::Element(_)),
            None => return false,
        };
        if !is_element {
            inner.nodes[node.0].kind = NodeKind::Text(text);
            return true;
        }

        let removed: Vec<NodeId> = inner.nodes[node.0].children.clone();
        for child in &removed {
            inner.unlink(*child);
        }
        let mut added = Vec::new();
        if !text.is_empty() {
            let text_id = inner.push(NodeData::text(text));
            inner.append(node, text_id);
            added.push(text_id);
        }
        inner.record(node, MutationKind::ChildList { added, removed });
        true
    }

    /// Concatenated text of a node and its descendants
    pub fn text_content(&self, node: NodeId) -> Option<String> {
        let inner = self.inner.lock();
        inner.node(node)?;
        let mut out = String::new();
        inner.collect_text(node, &mut out);
        Some(out)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.inner
            .lock()
            .node(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.inner.lock().node(node)?.parent
    }

    /// Whether the node is attached under the root
    pub fn is_connected(&self, node: NodeId) -> bool {
        let inner = self.inner.lock();
        inner.node(node).is_some() && inner.is_inclusive_ancestor(NodeId::ROOT, node)
    }

    pub fn tag_name(&self, node: NodeId) -> Option<String> {
        self.inner.lock().element(node).map(|el| el.tag.clone())
    }

    // ========================================================================
    // Attributes and properties
    // ========================================================================

    /// Set an attribute; always records a mutation, even if the value is unchanged
    pub fn set_attribute(&self, node: NodeId, name: &str, value: impl Into<String>) -> bool {
        let mut inner = self.inner.lock();
        let Some(el) = inner.element_mut(node) else {
            return false;
        };
        let old_value = el.set_attribute(name, value.into());
        inner.record(
            node,
            MutationKind::Attributes {
                name: name.to_string(),
                old_value,
            },
        );
        true
    }

    /// Remove an attribute; records a mutation only if it existed
    pub fn remove_attribute(&self, node: NodeId, name: &str) -> bool {
        let mut inner = self.inner.lock();
        let Some(old_value) = inner.element_mut(node).and_then(|el| el.remove_attribute(name))
        else {
            return false;
        };
        inner.record(
            node,
            MutationKind::Attributes {
                name: name.to_string(),
                old_value: Some(old_value),
            },
        );
        true
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.inner
            .lock()
            .element(node)?
            .attribute(name)
            .map(str::to_string)
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    /// Set an element property (not observable through mutation records)
    pub fn set_property(&self, node: NodeId, name: &str, value: impl Into<String>) -> bool {
        match self.inner.lock().element_mut(node) {
            Some(el) => {
                el.properties.insert(name.to_string(), value.into());
                true
            }
            None => false,
        }
    }

    pub fn property(&self, node: NodeId, name: &str) -> Option<String> {
        self.inner.lock().element(node)?.properties.get(name).cloned()
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// First connected element matching `selector`, in document order
    pub fn query_selector(&self, selector: &Selector) -> Option<NodeId> {
        self.inner.lock().select(selector, true).into_iter().next()
    }

    /// Every connected element matching `selector`, in document order
    pub fn query_selector_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.inner.lock().select(selector, false)
    }

    // ========================================================================
    // Mutation observers
    // ========================================================================

    /// Start observing `target`
    ///
    /// Only mutations on `target` itself are recorded. Records are held until
    /// the next [`Document::flush`].
    pub fn observe<F>(&self, target: NodeId, options: ObserveOptions, callback: F) -> ObserverHandle
    where
        F: Fn(&[MutationRecord], &Document) + Send + Sync + 'static,
    {
        let callback: MutationCallback = Arc::new(callback);
        let mut inner = self.inner.lock();
        let id = inner.next_handle();
        inner.observers.insert(
            id,
            ObserverEntry {
                target,
                options,
                callback,
                pending: Vec::new(),
            },
        );
        ObserverHandle {
            id,
            target,
            doc: Arc::downgrade(&self.inner),
        }
    }

    /// Number of connected observers
    pub fn observer_count(&self) -> usize {
        self.inner.lock().observers.len()
    }

    /// Number of records waiting for delivery
    pub fn pending_records(&self) -> usize {
        self.inner
            .lock()
            .observers
            .values()
            .map(|o| o.pending.len())
            .sum()
    }

    /// Deliver queued mutation records
    ///
    /// Each observer with pending records receives them as one batch, in
    /// observer creation order. Records queued by callbacks are delivered in
    /// further rounds before `flush` returns. Returns the number of records
    /// delivered.
    pub fn flush(&self) -> usize {
        let mut delivered = 0;

        for _ in 0..MAX_FLUSH_ROUNDS {
            let batches: Vec<(u64, MutationCallback, Vec<MutationRecord>)> = {
                let mut inner = self.inner.lock();
                inner
                    .observers
                    .iter_mut()
                    .filter(|(_, entry)| !entry.pending.is_empty())
                    .map(|(id, entry)| {
                        (*id, Arc::clone(&entry.callback), std::mem::take(&mut entry.pending))
                    })
                    .collect()
            };

            if batches.is_empty() {
                return delivered;
            }

            for (id, callback, records) in batches {
                // Disconnected by an earlier callback in this round
                if !self.inner.lock().observers.contains_key(&id) {
                    continue;
                }
                trace!(observer = id, records = records.len(), "delivering mutation batch");
                delivered += records.len();
                callback(&records, self);
            }
        }

        warn!("mutation delivery did not settle after {} rounds", MAX_FLUSH_ROUNDS);
        delivered
    }

    // ========================================================================
    // Events
    // ========================================================================

    pub fn add_event_listener<F>(&self, target: NodeId, event_type: EventType, callback: F) -> ListenerHandle
    where
        F: Fn(&Event, NodeId, &Document) + Send + Sync + 'static,
    {
        let callback: EventCallback = Arc::new(callback);
        let mut inner = self.inner.lock();
        let id = inner.next_handle();
        inner.listeners.insert(
            id,
            ListenerEntry {
                target,
                event_type,
                callback,
            },
        );
        ListenerHandle {
            id,
            doc: Arc::downgrade(&self.inner),
        }
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.inner.lock().listeners.len()
    }

    /// Dispatch an event on `target`, bubbling towards the root
    ///
    /// Listeners run synchronously: on the target first, then on each
    /// ancestor, in registration order per node. Returns the number of
    /// listeners invoked.
    pub fn dispatch_event(&self, target: NodeId, event: Event) -> usize {
        let event_type = event.event_type;
        let callbacks: Vec<EventCallback> = {
            let inner = self.inner.lock();
            if inner.node(target).is_none() {
                return 0;
            }

            let mut path = Vec::new();
            let mut current = Some(target);
            while let Some(id) = current {
                path.push(id);
                current = inner.nodes[id.0].parent;
            }

            path.iter()
                .flat_map(|node| {
                    inner
                        .listeners
                        .values()
                        .filter(move |l| l.target == *node && l.event_type == event_type)
                        .map(|l| Arc::clone(&l.callback))
                })
                .collect()
        };

        for callback in &callbacks {
            callback(&event, target, self);
        }
        callbacks.len()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Document")
            .field("node_count", &inner.nodes.len())
            .field("observer_count", &inner.observers.len())
            .field("listener_count", &inner.listeners.len())
            .finish()
    }
}
