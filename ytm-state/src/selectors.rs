//! Where each field lives in the player page
//!
//! The player UI is versioned independently of this crate, so every
//! structural assumption about it lives here: selectors, attribute names,
//! the idle cover placeholder and the transport key bindings. `SelectorMap`
//! is the editable form (with JSON overrides); `CompiledSelectors` is what
//! the reader, watchers and commands use.

use page_tree::Selector;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StateError};

/// Attribute names observed or written on player nodes
pub mod attr {
    /// Present on `#player` while a video is shown
    pub const VIDEO_MODE: &str = "video-mode_";
    /// Volume slider value and seek target
    pub const VALUE: &str = "value";
    /// Track duration in seconds
    pub const VALUE_MAX: &str = "aria-valuemax";
    /// Playback position in seconds
    pub const VALUE_NOW: &str = "aria-valuenow";
    pub const HREF: &str = "href";
    pub const REPEAT_MODE: &str = "repeat-mode_";
    pub const SRC: &str = "src";
    pub const LIKE_STATUS: &str = "like-status";
}

/// Element property holding the media element's pause flag
pub const PAUSED_PROPERTY: &str = "paused";

/// Marker in an image source that means the cover is inlined (video mode)
pub const INLINE_IMAGE_MARKER: &str = "data:image";

/// Keyboard shortcuts the player binds to transport commands
pub mod keys {
    pub const PLAY_PAUSE: &str = ";";
    pub const NEXT_TRACK: &str = "j";
    pub const PREV_TRACK: &str = "k";
}

/// Selector text for every node the mirror touches
///
/// Missing keys in JSON fall back to the defaults, so overrides can be
/// partial:
///
/// ```rust
/// use ytm_state::SelectorMap;
///
/// let map = SelectorMap::from_json(r##"{ "volume_slider": "#volume" }"##).unwrap();
/// assert_eq!(map.volume_slider, "#volume");
/// assert_eq!(map.progress_bar, "#progress-bar");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorMap {
    pub player_bar: String,
    pub player: String,
    pub video: String,
    pub volume_slider: String,
    pub title: String,
    pub byline: String,
    pub subtitle: String,
    pub subtitle_items: String,
    pub progress_bar: String,
    pub title_link: String,
    pub cover_image: String,
    pub thumbnail: String,
    pub like_button: String,
    pub seek_sliders: String,
    /// Which of the `seek_sliders` matches must be activated before seeking
    pub seek_slider_index: usize,
    /// Thumbnail source shown while nothing is loaded
    pub cover_placeholder: String,
}

impl Default for SelectorMap {
    fn default() -> Self {
        Self {
            player_bar: "ytmusic-player-bar".to_string(),
            player: "#player".to_string(),
            video: "video".to_string(),
            volume_slider: "#volume-slider".to_string(),
            title: ".title.ytmusic-player-bar".to_string(),
            byline: ".byline.ytmusic-player-bar".to_string(),
            subtitle: ".subtitle.ytmusic-player-bar".to_string(),
            subtitle_items: ".subtitle.ytmusic-player-bar>yt-formatted-string>.yt-formatted-string"
                .to_string(),
            progress_bar: "#progress-bar".to_string(),
            title_link: ".ytp-title-link.yt-uix-sessionlink".to_string(),
            cover_image: ".thumbnail.ytmusic-player.no-transition>.yt-img-shadow".to_string(),
            thumbnail: ".image.ytmusic-player-bar".to_string(),
            like_button: "#like-button-renderer".to_string(),
            seek_sliders: ".bar-container .tp-yt-paper-slider".to_string(),
            seek_slider_index: 2,
            cover_placeholder: "https://music.youtube.com/".to_string(),
        }
    }
}

impl SelectorMap {
    /// Parse a (possibly partial) selector map from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Compile every selector, reporting the first one that fails
    pub fn compile(&self) -> Result<CompiledSelectors> {
        fn compile(name: &'static str, text: &str) -> Result<Selector> {
            Selector::parse(text).map_err(|source| StateError::Selector { name, source })
        }

        Ok(CompiledSelectors {
            player_bar: compile("player_bar", &self.player_bar)?,
            player: compile("player", &self.player)?,
            video: compile("video", &self.video)?,
            volume_slider: compile("volume_slider", &self.volume_slider)?,
            title: compile("title", &self.title)?,
            byline: compile("byline", &self.byline)?,
            subtitle: compile("subtitle", &self.subtitle)?,
            subtitle_items: compile("subtitle_items", &self.subtitle_items)?,
            progress_bar: compile("progress_bar", &self.progress_bar)?,
            title_link: compile("title_link", &self.title_link)?,
            cover_image: compile("cover_image", &self.cover_image)?,
            thumbnail: compile("thumbnail", &self.thumbnail)?,
            like_button: compile("like_button", &self.like_button)?,
            seek_sliders: compile("seek_sliders", &self.seek_sliders)?,
            seek_slider_index: self.seek_slider_index,
            cover_placeholder: self.cover_placeholder.clone(),
        })
    }
}

/// Compiled form of a `SelectorMap`
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub player_bar: Selector,
    pub player: Selector,
    pub video: Selector,
    pub volume_slider: Selector,
    pub title: Selector,
    pub byline: Selector,
    pub subtitle: Selector,
    pub subtitle_items: Selector,
    pub progress_bar: Selector,
    pub title_link: Selector,
    pub cover_image: Selector,
    pub thumbnail: Selector,
    pub like_button: Selector,
    pub seek_sliders: Selector,
    pub seek_slider_index: usize,
    pub cover_placeholder: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_compile() {
        let compiled = SelectorMap::default().compile().unwrap();
        assert_eq!(compiled.progress_bar.as_str(), "#progress-bar");
        assert_eq!(compiled.seek_slider_index, 2);
    }

    #[test]
    fn test_partial_override() {
        let map = SelectorMap::from_json(r#"{ "seek_slider_index": 0 }"#).unwrap();
        assert_eq!(map.seek_slider_index, 0);
        assert_eq!(map.title, SelectorMap::default().title);
    }

    #[test]
    fn test_invalid_selector_names_the_entry() {
        let map = SelectorMap {
            like_button: "#".to_string(),
            ..Default::default()
        };
        match map.compile() {
            Err(StateError::Selector { name, .. }) => assert_eq!(name, "like_button"),
            other => panic!("expected selector error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        assert!(matches!(
            SelectorMap::from_json("{ not json"),
            Err(StateError::Config(_))
        ));
    }
}
