//! Transport and slider commands
//!
//! The player has no programmatic control surface, so commands act the way
//! a user would: by writing slider values and sending synthetic input.
//! Every command reports whether it found its target; a missing target is a
//! silent no-op.

use std::sync::Arc;

use page_tree::{Document, Event, EventType, NodeId};
use tracing::debug;

use crate::selectors::{attr, keys, CompiledSelectors};

/// Input a command injects into the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticInput {
    /// Key press, identified by the key it produces
    Key(&'static str),
    /// Pointer activation
    Click,
    /// Form control value committed
    Change,
}

impl SyntheticInput {
    /// Host event for this input
    pub fn to_event(self) -> Event {
        match self {
            SyntheticInput::Key(key) => Event::key_down(key),
            SyntheticInput::Click => Event::new(EventType::Click),
            SyntheticInput::Change => Event::new(EventType::Change),
        }
    }
}

/// Executes commands against a document
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    doc: Document,
    selectors: Arc<CompiledSelectors>,
}

impl CommandDispatcher {
    pub fn new(doc: Document, selectors: Arc<CompiledSelectors>) -> Self {
        Self { doc, selectors }
    }

    /// Move the volume slider and commit the new value
    pub fn set_volume(&self, volume: u8) -> bool {
        let Some(slider) = self.doc.query_selector(&self.selectors.volume_slider) else {
            debug!("set_volume: volume slider not present");
            return false;
        };
        self.doc.set_attribute(slider, attr::VALUE, volume.to_string());
        self.send(slider, SyntheticInput::Change);
        true
    }

    /// Seek to `seconds`
    ///
    /// Activates the progress slider, then writes the target value on the
    /// progress bar. Both must be present or nothing is touched.
    pub fn set_position(&self, seconds: u32) -> bool {
        let slider = self
            .doc
            .query_selector_all(&self.selectors.seek_sliders)
            .get(self.selectors.seek_slider_index)
            .copied();
        let bar = self.doc.query_selector(&self.selectors.progress_bar);

        let (Some(slider), Some(bar)) = (slider, bar) else {
            debug!(
                slider = slider.is_some(),
                progress_bar = bar.is_some(),
                "set_position: seek target not present"
            );
            return false;
        };
        self.send(slider, SyntheticInput::Click);
        self.doc.set_attribute(bar, attr::VALUE, seconds.to_string());
        true
    }

    pub fn play_pause(&self) -> bool {
        self.press(keys::PLAY_PAUSE)
    }

    pub fn next_track(&self) -> bool {
        self.press(keys::NEXT_TRACK)
    }

    pub fn prev_track(&self) -> bool {
        self.press(keys::PREV_TRACK)
    }

    /// Keyboard shortcuts are handled at the document level
    fn press(&self, key: &'static str) -> bool {
        self.send(self.doc.root(), SyntheticInput::Key(key));
        true
    }

    fn send(&self, target: NodeId, input: SyntheticInput) {
        let listeners = self.doc.dispatch_event(target, input.to_event());
        debug!(?input, %target, listeners, "synthetic input sent");
    }
}
