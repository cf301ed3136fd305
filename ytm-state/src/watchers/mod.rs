//! Field watchers
//!
//! One watcher per field turns host notifications into bus events. The
//! registry attaches them all at `start()` and disposes them at `stop()`.
//!
//! # Watcher kinds
//!
//! | Kind | Fields | Host facility |
//! |------|--------|---------------|
//! | attribute | isVideo, volume, duration, position, url, loopType, coverUrl, likeStatus | attribute observer |
//! | content | title | child-list observer |
//! | signal | isPaused | `Play` / `Pause` listeners |
//! | composite | author, albumName | container observer + item observer |
//! | one-shot | isPlaying | container observer, disconnected after first batch |
//!
//! Every watcher except the one-shot compares the freshly read value with
//! the last value it saw and stays silent when they are equal.

mod attribute;
mod composite;
mod content;
mod signal;

use std::sync::Arc;

use event_bus::EventBus;
use page_tree::{Document, ListenerHandle, ObserverHandle};
use parking_lot::Mutex;
use tracing::{debug, info, trace};

use crate::error::{Result, StateError};
use crate::field::{Field, FieldChange};
use crate::reader::SnapshotReader;
use crate::selectors::{attr, CompiledSelectors};

pub(crate) use composite::SubtitleItemWatch;

/// Order in which watchers are attached
pub const WATCH_ORDER: [Field; 13] = [
    Field::IsPlaying,
    Field::IsPaused,
    Field::IsVideo,
    Field::Volume,
    Field::Title,
    Field::Author,
    Field::Duration,
    Field::Position,
    Field::Url,
    Field::LoopType,
    Field::CoverUrl,
    Field::AlbumName,
    Field::LikeStatus,
];

/// What watchers need to read the tree and publish
#[derive(Clone)]
pub(crate) struct WatchContext {
    pub doc: Document,
    pub selectors: Arc<CompiledSelectors>,
    pub bus: EventBus<FieldChange>,
}

impl WatchContext {
    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader::new(self.doc.clone(), Arc::clone(&self.selectors))
    }

    /// Publish a change on its field channel (and the wildcard)
    pub fn publish(bus: &EventBus<FieldChange>, change: FieldChange) {
        let key = change.key();
        let delivered = bus.emit(key, change);
        trace!(field = key, delivered, "field changed");
    }
}

/// Last value a watcher saw, used to suppress repeats
pub(crate) struct LastValue(Mutex<FieldChange>);

impl LastValue {
    pub fn new(seed: FieldChange) -> Self {
        Self(Mutex::new(seed))
    }

    /// Store `next`, returning whether it differs from the previous value
    pub fn replace(&self, next: &FieldChange) -> bool {
        let mut last = self.0.lock();
        if *last == *next {
            trace!(field = next.key(), "unchanged, suppressed");
            return false;
        }
        *last = next.clone();
        true
    }
}

/// A live watcher's host-side registrations
pub(crate) enum Attachment {
    Observer(ObserverHandle),
    Listeners(Vec<ListenerHandle>),
    Composite(Arc<SubtitleItemWatch>),
}

impl Attachment {
    /// Tear down every registration; returns whether anything was still live
    fn dispose(&self) -> bool {
        match self {
            Attachment::Observer(handle) => handle.disconnect(),
            Attachment::Listeners(handles) => handles
                .iter()
                .fold(false, |any, handle| handle.remove() || any),
            Attachment::Composite(watch) => watch.dispose(),
        }
    }
}

/// Outcome of [`Registry::start`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartReport {
    /// Fields with a live watcher
    pub attached: Vec<Field>,
    /// Fields whose node was missing; these never fire until restarted
    pub dormant: Vec<Field>,
}

/// Owns the field watchers of one player
pub struct Registry {
    ctx: WatchContext,
    watches: Mutex<Option<Vec<(Field, Attachment)>>>,
}

impl Registry {
    pub(crate) fn new(ctx: WatchContext) -> Self {
        Self {
            ctx,
            watches: Mutex::new(None),
        }
    }

    /// Attach every watcher whose node is present
    ///
    /// Attaching never emits; values present at this point become the
    /// baseline later changes are compared against.
    pub fn start(&self) -> Result<StartReport> {
        let mut watches = self.watches.lock();
        if watches.is_some() {
            return Err(StateError::AlreadyRunning);
        }

        let mut report = StartReport::default();
        let mut live = Vec::with_capacity(WATCH_ORDER.len());
        for field in WATCH_ORDER {
            match self.attach(field) {
                Some(attachment) => {
                    report.attached.push(field);
                    live.push((field, attachment));
                }
                None => {
                    debug!(field = %field, "node not present, watcher dormant");
                    report.dormant.push(field);
                }
            }
        }

        info!(
            attached = report.attached.len(),
            dormant = report.dormant.len(),
            "field watchers started"
        );
        *watches = Some(live);
        Ok(report)
    }

    /// Dispose every watcher, returning how many were attached
    ///
    /// Records still queued for the disposed observers are dropped. Stopping
    /// a stopped registry is a no-op.
    pub fn stop(&self) -> usize {
        let Some(live) = self.watches.lock().take() else {
            return 0;
        };

        for (field, attachment) in &live {
            if !attachment.dispose() {
                debug!(field = %field, "watcher had already detached");
            }
        }
        info!(count = live.len(), "field watchers stopped");
        live.len()
    }

    pub fn is_running(&self) -> bool {
        self.watches.lock().is_some()
    }

    fn attach(&self, field: Field) -> Option<Attachment> {
        let ctx = &self.ctx;
        let s = &ctx.selectors;
        match field {
            Field::IsPlaying => composite::watch_playing(ctx),
            Field::IsPaused => signal::watch_paused(ctx),
            Field::IsVideo => attribute::watch_attribute(ctx, field, &s.player, attr::VIDEO_MODE),
            Field::Volume => attribute::watch_attribute(ctx, field, &s.volume_slider, attr::VALUE),
            Field::Title => content::watch_content(ctx, field, &s.title),
            Field::Author => composite::watch_subtitle_item(ctx, field, SnapshotReader::author_node),
            Field::AlbumName => {
                composite::watch_subtitle_item(ctx, field, SnapshotReader::album_node)
            }
            Field::Duration => {
                attribute::watch_attribute(ctx, field, &s.progress_bar, attr::VALUE_MAX)
            }
            Field::Position => {
                attribute::watch_attribute(ctx, field, &s.progress_bar, attr::VALUE_NOW)
            }
            Field::Url => attribute::watch_attribute(ctx, field, &s.title_link, attr::HREF),
            Field::LoopType => {
                attribute::watch_attribute(ctx, field, &s.player_bar, attr::REPEAT_MODE)
            }
            Field::CoverUrl => attribute::watch_attribute(ctx, field, &s.thumbnail, attr::SRC),
            Field::LikeStatus => {
                attribute::watch_attribute(ctx, field, &s.like_button, attr::LIKE_STATUS)
            }
        }
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let watches = self.watches.lock();
        f.debug_struct("Registry")
            .field("running", &watches.is_some())
            .field(
                "fields",
                &watches
                    .as_ref()
                    .map(|w| w.iter().map(|(field, _)| *field).collect::<Vec<_>>()),
            )
            .finish()
    }
}
