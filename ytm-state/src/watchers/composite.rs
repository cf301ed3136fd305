//! Watchers built on the subtitle container
//!
//! The subtitle row is rebuilt wholesale when the track changes, so the
//! nodes holding the artist and album do not outlive a track. Author and
//! album name therefore resolve their node in two phases:
//!
//! ```text
//!              container batch, item found
//! Unresolved ─────────────────────────────► Resolved(node, item observer)
//!     ▲                                          │   │
//!     │        container batch, no item          │   │ container batch, other item:
//!     └──────────────────────────────────────────┘   │ swap item observer, emit
//!                                                    │
//!                                    item edited ────┘ emit, no re-resolution
//! ```
//!
//! `isPlaying` uses the same container, but only waits for its first batch.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use event_bus::EventBus;
use page_tree::{Document, NodeId, ObserveOptions, ObserverHandle};
use parking_lot::Mutex;
use tracing::{debug, trace};

use super::{Attachment, WatchContext};
use crate::field::{Field, FieldChange};
use crate::reader::SnapshotReader;
use crate::selectors::CompiledSelectors;

/// Finds the item node for a field in the current subtitle row
pub(crate) type Locator = fn(&SnapshotReader) -> Option<NodeId>;

enum Phase {
    Unresolved,
    Resolved { node: NodeId, item: ObserverHandle },
    Disposed,
}

/// State machine for one subtitle-derived field
pub(crate) struct SubtitleItemWatch {
    field: Field,
    locate: Locator,
    selectors: Arc<CompiledSelectors>,
    bus: EventBus<FieldChange>,
    phase: Mutex<Phase>,
    last: Mutex<Option<String>>,
    container: Mutex<Option<ObserverHandle>>,
    resolutions: AtomicUsize,
}

pub(crate) fn watch_subtitle_item(ctx: &WatchContext, field: Field, locate: Locator) -> Option<Attachment> {
    let container = ctx.doc.query_selector(&ctx.selectors.subtitle)?;
    let reader = ctx.reader();

    let watch = Arc::new(SubtitleItemWatch {
        field,
        locate,
        selectors: Arc::clone(&ctx.selectors),
        bus: ctx.bus.clone(),
        phase: Mutex::new(Phase::Unresolved),
        last: Mutex::new(None),
        container: Mutex::new(None),
        resolutions: AtomicUsize::new(0),
    });

    // Resolve silently so the current track becomes the baseline
    if let Some(node) = locate(&reader) {
        let item = watch.observe_item(&ctx.doc, node);
        *watch.phase.lock() = Phase::Resolved { node, item };
        *watch.last.lock() = ctx.doc.text_content(node).filter(|text| !text.is_empty());
    }

    let weak = Arc::downgrade(&watch);
    let handle = ctx.doc.observe(container, ObserveOptions::child_list(), move |records, doc| {
        let Some(watch) = weak.upgrade() else {
            return;
        };
        for _ in records {
            watch.resolve(doc);
        }
    });
    *watch.container.lock() = Some(handle);

    Some(Attachment::Composite(watch))
}

impl SubtitleItemWatch {
    /// Re-run resolution after the container changed
    fn resolve(self: &Arc<Self>, doc: &Document) {
        let reader = SnapshotReader::new(doc.clone(), Arc::clone(&self.selectors));
        let found = (self.locate)(&reader);

        let node = {
            let mut phase = self.phase.lock();
            let current = match &*phase {
                Phase::Disposed => return,
                Phase::Resolved { node, .. } => Some(*node),
                Phase::Unresolved => None,
            };

            match found {
                Some(found) if current == Some(found) => return,
                None => {
                    if let Phase::Resolved { item, .. } =
                        std::mem::replace(&mut *phase, Phase::Unresolved)
                    {
                        item.disconnect();
                    }
                    debug!(field = %self.field, "subtitle item not present, unresolved");
                    return;
                }
                Some(found) => {
                    if let Phase::Resolved { item, .. } =
                        std::mem::replace(&mut *phase, Phase::Unresolved)
                    {
                        item.disconnect();
                    }
                    let item = self.observe_item(doc, found);
                    *phase = Phase::Resolved { node: found, item };
                    self.resolutions.fetch_add(1, Ordering::Relaxed);
                    trace!(field = %self.field, node = %found, "subtitle item resolved");
                    found
                }
            }
        };

        self.emit_text(doc, node);
    }

    /// Watch the resolved item for in-place text edits
    fn observe_item(self: &Arc<Self>, doc: &Document, node: NodeId) -> ObserverHandle {
        let weak = Arc::downgrade(self);
        doc.observe(node, ObserveOptions::child_list(), move |_records, doc| {
            let Some(watch) = weak.upgrade() else {
                return;
            };
            let current = matches!(*watch.phase.lock(), Phase::Resolved { node: n, .. } if n == node);
            if current {
                watch.emit_text(doc, node);
            }
        })
    }

    fn emit_text(&self, doc: &Document, node: NodeId) {
        let Some(text) = doc.text_content(node).filter(|text| !text.is_empty()) else {
            trace!(field = %self.field, "empty subtitle item, not emitted");
            return;
        };

        {
            let mut last = self.last.lock();
            if last.as_deref() == Some(text.as_str()) {
                trace!(field = %self.field, "unchanged, suppressed");
                return;
            }
            *last = Some(text.clone());
        }

        let change = match self.field {
            Field::AlbumName => FieldChange::AlbumName(Some(text)),
            _ => FieldChange::Author(Some(text)),
        };
        WatchContext::publish(&self.bus, change);
    }

    /// Disconnect the container and item observers
    pub(crate) fn dispose(&self) -> bool {
        let container = self.container.lock().take();
        let phase = std::mem::replace(&mut *self.phase.lock(), Phase::Disposed);
        if let Phase::Resolved { item, .. } = phase {
            item.disconnect();
        }
        container.is_some_and(|handle| handle.disconnect())
    }

    /// How many times a new item node was resolved
    #[cfg(test)]
    pub(crate) fn resolutions(&self) -> usize {
        self.resolutions.load(Ordering::Relaxed)
    }
}

/// Emit `isPlaying: true` on the first container batch, then detach
///
/// Nothing ever reports `false` here; the reader is the only source of that.
pub(crate) fn watch_playing(ctx: &WatchContext) -> Option<Attachment> {
    let container = ctx.doc.query_selector(&ctx.selectors.subtitle)?;
    let slot: Arc<Mutex<Option<ObserverHandle>>> = Arc::new(Mutex::new(None));
    let bus = ctx.bus.clone();

    let slot_cb = Arc::clone(&slot);
    let handle = ctx.doc.observe(container, ObserveOptions::child_list(), move |_records, _doc| {
        let Some(own) = slot_cb.lock().take() else {
            return;
        };
        own.disconnect();
        WatchContext::publish(&bus, FieldChange::IsPlaying(true));
    });
    *slot.lock() = Some(handle.clone());

    Some(Attachment::Observer(handle))
}
