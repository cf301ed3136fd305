//! YTM State
//!
//! Mirrors the now-playing state of the YouTube Music player bar: read it
//! on demand, get told when a field changes, and drive playback.
//!
//! # Features
//!
//! - **Snapshot reads**: [`Player::full_state`] builds a [`NowPlaying`] from the page
//! - **Change events**: per-field and wildcard subscriptions, only fired on real changes
//! - **Commands**: volume, seek and transport keys, via synthetic input
//! - **Configurable mapping**: every selector lives in one [`SelectorMap`], loadable from JSON
//!
//! # Quick Start
//!
//! ```rust
//! use page_tree::{Document, ElementSpec};
//! use ytm_state::{Field, FieldChange, Player};
//!
//! let doc = Document::new();
//! let player_bar = doc
//!     .insert(doc.root(), ElementSpec::new("ytmusic-player-bar").attr("repeat-mode_", "NONE"))
//!     .unwrap();
//!
//! let player = Player::new(doc.clone()).unwrap();
//! player.subscribe(Field::LoopType, |event| {
//!     println!("{} -> {:?}", event.key, event.value);
//! });
//! let report = player.start().unwrap();
//! assert!(report.attached.contains(&Field::LoopType));
//!
//! doc.set_attribute(player_bar, "repeat-mode_", "ALL");
//! doc.flush();
//!
//! assert_eq!(
//!     player.read(Field::LoopType),
//!     FieldChange::LoopType(Some(ytm_state::LoopType::All))
//! );
//! player.stop();
//! ```
//!
//! # Architecture
//!
//! ```text
//! Player
//!     ├── SnapshotReader     point-in-time queries      (full_state, read)
//!     ├── Registry           field watchers             (start, stop)
//!     │       └── observers / listeners on the Document ──► EventBus<FieldChange>
//!     ├── EventBus           per-field + "all" channels (subscribe, iter)
//!     └── CommandDispatcher  synthetic input            (set_volume, play_pause, ...)
//! ```
//!
//! Watchers only run inside `Document::flush()` and `Document::dispatch_event()`;
//! there are no background threads.

// Modules
pub mod commands;
pub mod decoder;
pub mod error;
pub mod field;
pub mod logging;
pub mod player;
pub mod reader;
pub mod selectors;
pub mod snapshot;
pub mod watchers;

// Re-exports - Public API
pub use commands::{CommandDispatcher, SyntheticInput};
pub use error::{Result, StateError};
pub use field::{Field, FieldChange, LikeStatus, LoopType};
pub use player::Player;
pub use reader::SnapshotReader;
pub use selectors::{CompiledSelectors, SelectorMap};
pub use snapshot::NowPlaying;
pub use watchers::{Registry, StartReport, WATCH_ORDER};

// Bus types that appear in the public API
pub use event_bus::{ChangeEvent, ChangeIterator, Subscription, WILDCARD};
