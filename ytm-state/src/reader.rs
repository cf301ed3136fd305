//! Synchronous point-in-time queries against the player tree
//!
//! Every query is pure: it looks up its node, reads one attribute, property
//! or text, and decodes it. An absent node reads as `None`.

use std::sync::Arc;

use page_tree::{Document, NodeId};

use crate::decoder;
use crate::field::{Field, FieldChange, LikeStatus, LoopType};
use crate::selectors::{attr, CompiledSelectors, INLINE_IMAGE_MARKER, PAUSED_PROPERTY};
use crate::snapshot::NowPlaying;

/// Reads now-playing fields from a document
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    doc: Document,
    selectors: Arc<CompiledSelectors>,
}

impl SnapshotReader {
    pub fn new(doc: Document, selectors: Arc<CompiledSelectors>) -> Self {
        Self { doc, selectors }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn selectors(&self) -> &CompiledSelectors {
        &self.selectors
    }

    // ========================================================================
    // Per-field queries
    // ========================================================================

    /// Whether a track is loaded (the byline is only rendered then)
    pub fn is_playing(&self) -> bool {
        self.doc.query_selector(&self.selectors.byline).is_some()
    }

    pub fn is_paused(&self) -> Option<bool> {
        let video = self.doc.query_selector(&self.selectors.video)?;
        let raw = self.doc.property(video, PAUSED_PROPERTY);
        Some(decoder::decode_paused(raw.as_deref()))
    }

    pub fn is_video(&self) -> Option<bool> {
        let player = self.doc.query_selector(&self.selectors.player)?;
        Some(self.doc.has_attribute(player, attr::VIDEO_MODE))
    }

    pub fn volume(&self) -> Option<u8> {
        let raw = self.attribute_of(&self.selectors.volume_slider, attr::VALUE);
        decoder::decode_volume(raw.as_deref())
    }

    pub fn title(&self) -> Option<String> {
        let node = self.doc.query_selector(&self.selectors.title)?;
        self.doc.text_content(node)
    }

    pub fn author(&self) -> Option<String> {
        self.author_node().and_then(|node| self.doc.text_content(node))
    }

    pub fn album_name(&self) -> Option<String> {
        self.album_node().and_then(|node| self.doc.text_content(node))
    }

    pub fn duration(&self) -> Option<u32> {
        let raw = self.attribute_of(&self.selectors.progress_bar, attr::VALUE_MAX);
        decoder::decode_seconds(raw.as_deref())
    }

    pub fn position(&self) -> Option<u32> {
        let raw = self.attribute_of(&self.selectors.progress_bar, attr::VALUE_NOW);
        decoder::decode_seconds(raw.as_deref())
    }

    pub fn url(&self) -> Option<String> {
        self.attribute_of(&self.selectors.title_link, attr::HREF)
    }

    pub fn loop_type(&self) -> Option<LoopType> {
        let raw = self.attribute_of(&self.selectors.player_bar, attr::REPEAT_MODE);
        decoder::decode_loop_type(raw.as_deref())
    }

    /// Cover art location
    ///
    /// In video mode the main cover is an inline image, so the player bar
    /// thumbnail is used instead. That thumbnail shows a placeholder while
    /// idle, which reads as `None`.
    pub fn cover_url(&self) -> Option<String> {
        let primary = self.doc.query_selector(&self.selectors.cover_image)?;
        let src = self.doc.attribute(primary, attr::SRC).unwrap_or_default();
        if !src.contains(INLINE_IMAGE_MARKER) {
            return Some(src);
        }

        let thumbnail = self.attribute_of(&self.selectors.thumbnail, attr::SRC)?;
        if thumbnail == self.selectors.cover_placeholder {
            return None;
        }
        Some(thumbnail)
    }

    pub fn like_status(&self) -> Option<LikeStatus> {
        let raw = self.attribute_of(&self.selectors.like_button, attr::LIKE_STATUS);
        decoder::decode_like_status(raw.as_deref())
    }

    // ========================================================================
    // Aggregates
    // ========================================================================

    /// Read a single field
    pub fn read_field(&self, field: Field) -> FieldChange {
        match field {
            Field::IsPlaying => FieldChange::IsPlaying(self.is_playing()),
            Field::IsPaused => FieldChange::IsPaused(self.is_paused()),
            Field::IsVideo => FieldChange::IsVideo(self.is_video()),
            Field::Volume => FieldChange::Volume(self.volume()),
            Field::Title => FieldChange::Title(self.title()),
            Field::Author => FieldChange::Author(self.author()),
            Field::AlbumName => FieldChange::AlbumName(self.album_name()),
            Field::Duration => FieldChange::Duration(self.duration()),
            Field::Position => FieldChange::Position(self.position()),
            Field::Url => FieldChange::Url(self.url()),
            Field::LoopType => FieldChange::LoopType(self.loop_type()),
            Field::CoverUrl => FieldChange::CoverUrl(self.cover_url()),
            Field::LikeStatus => FieldChange::LikeStatus(self.like_status()),
        }
    }

    /// Read every field
    pub fn full_state(&self) -> NowPlaying {
        NowPlaying {
            is_playing: self.is_playing(),
            is_paused: self.is_paused(),
            is_video: self.is_video(),
            volume: self.volume(),
            title: self.title(),
            author: self.author(),
            album_name: self.album_name(),
            duration: self.duration(),
            position: self.position(),
            url: self.url(),
            loop_type: self.loop_type(),
            cover_url: self.cover_url(),
            like_status: self.like_status(),
        }
    }

    // ========================================================================
    // Node lookups shared with the watchers
    // ========================================================================

    /// First subtitle item: the artist
    pub(crate) fn author_node(&self) -> Option<NodeId> {
        self.doc
            .query_selector_all(&self.selectors.subtitle_items)
            .first()
            .copied()
    }

    /// Third-from-last subtitle item: the album
    pub(crate) fn album_node(&self) -> Option<NodeId> {
        let items = self.doc.query_selector_all(&self.selectors.subtitle_items);
        items.len().checked_sub(3).map(|i| items[i])
    }

    fn attribute_of(&self, selector: &page_tree::Selector, name: &str) -> Option<String> {
        let node = self.doc.query_selector(selector)?;
        self.doc.attribute(node, name)
    }
}
