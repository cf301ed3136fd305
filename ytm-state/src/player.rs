//! The player facade

use std::sync::Arc;

use event_bus::{ChangeEvent, ChangeIterator, EventBus, Subscription, WILDCARD};
use page_tree::Document;

use crate::commands::CommandDispatcher;
use crate::error::{Result, StateError};
use crate::field::{Field, FieldChange};
use crate::reader::SnapshotReader;
use crate::selectors::SelectorMap;
use crate::snapshot::NowPlaying;
use crate::watchers::{Registry, StartReport, WatchContext};

/// Mirror of one player page
///
/// Owns everything needed to read, watch and drive the player bar of a
/// single document. Nothing is global; create one `Player` per document.
///
/// ```rust
/// use page_tree::{Document, ElementSpec};
/// use ytm_state::{Field, FieldChange, Player};
///
/// let doc = Document::new();
/// let slider = doc
///     .insert(doc.root(), ElementSpec::new("tp-yt-paper-slider").id("volume-slider").attr("value", "40"))
///     .unwrap();
///
/// let player = Player::new(doc.clone()).unwrap();
/// let changes = player.iter();
/// player.start().unwrap();
///
/// doc.set_attribute(slider, "value", "55");
/// doc.flush();
///
/// let event = changes.try_recv().unwrap();
/// assert_eq!(event.key, "volume");
/// assert_eq!(event.value, FieldChange::Volume(Some(55)));
/// assert_eq!(player.full_state().volume, Some(55));
/// ```
#[derive(Debug)]
pub struct Player {
    reader: SnapshotReader,
    bus: EventBus<FieldChange>,
    registry: Registry,
    commands: CommandDispatcher,
}

impl Player {
    /// Create a player using the default selectors
    pub fn new(doc: Document) -> Result<Self> {
        Self::with_selectors(doc, &SelectorMap::default())
    }

    /// Create a player with a custom selector map
    pub fn with_selectors(doc: Document, selectors: &SelectorMap) -> Result<Self> {
        let selectors = Arc::new(selectors.compile()?);
        let bus = EventBus::new();
        let registry = Registry::new(WatchContext {
            doc: doc.clone(),
            selectors: Arc::clone(&selectors),
            bus: bus.clone(),
        });

        Ok(Self {
            reader: SnapshotReader::new(doc.clone(), Arc::clone(&selectors)),
            commands: CommandDispatcher::new(doc, selectors),
            bus,
            registry,
        })
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub fn full_state(&self) -> NowPlaying {
        self.reader.full_state()
    }

    pub fn read(&self, field: Field) -> FieldChange {
        self.reader.read_field(field)
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Call `callback` for every change of `field`
    pub fn subscribe<F>(&self, field: Field, callback: F) -> Subscription
    where
        F: Fn(&ChangeEvent<FieldChange>) + Send + Sync + 'static,
    {
        self.bus.subscribe(field.key(), callback)
    }

    /// Subscribe by key: a field name such as `"volume"`, or `"all"`
    pub fn subscribe_key<F>(&self, key: &str, callback: F) -> Result<Subscription>
    where
        F: Fn(&ChangeEvent<FieldChange>) + Send + Sync + 'static,
    {
        if key != WILDCARD && Field::from_key(key).is_none() {
            return Err(StateError::UnknownField(key.to_string()));
        }
        Ok(self.bus.subscribe(key, callback))
    }

    /// Call `callback` for every change of any field
    pub fn subscribe_all<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&ChangeEvent<FieldChange>) + Send + Sync + 'static,
    {
        self.bus.subscribe_all(callback)
    }

    /// Blocking iterator over every change from now on
    pub fn iter(&self) -> ChangeIterator<FieldChange> {
        self.bus.iter()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Attach the field watchers
    pub fn start(&self) -> Result<StartReport> {
        self.registry.start()
    }

    /// Detach every field watcher; subscriptions stay registered
    pub fn stop(&self) -> usize {
        self.registry.stop()
    }

    pub fn is_running(&self) -> bool {
        self.registry.is_running()
    }

    // ========================================================================
    // Commands
    // ========================================================================

    pub fn set_volume(&self, volume: u8) -> bool {
        self.commands.set_volume(volume)
    }

    pub fn set_position(&self, seconds: u32) -> bool {
        self.commands.set_position(seconds)
    }

    pub fn play_pause(&self) -> bool {
        self.commands.play_pause()
    }

    pub fn next_track(&self) -> bool {
        self.commands.next_track()
    }

    pub fn prev_track(&self) -> bool {
        self.commands.prev_track()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn document(&self) -> &Document {
        self.reader.document()
    }

    pub fn reader(&self) -> &SnapshotReader {
        &self.reader
    }

    pub fn bus(&self) -> &EventBus<FieldChange> {
        &self.bus
    }
}
