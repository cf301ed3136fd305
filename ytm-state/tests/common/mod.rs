//! Shared fixture: a player page laid out like the live UI

#![allow(dead_code)]

use std::sync::Arc;

use page_tree::{Document, ElementSpec, Event, EventType, NodeId, Selector};
use parking_lot::Mutex;
use ytm_state::{FieldChange, Player};

pub const PLACEHOLDER: &str = "https://music.youtube.com/";

/// Track metadata as the page renders it
#[derive(Debug, Clone)]
pub struct Track {
    pub title: &'static str,
    pub artist: &'static str,
    pub album: &'static str,
    pub year: &'static str,
    pub duration: u32,
    pub url: &'static str,
    pub thumbnail: &'static str,
}

impl Track {
    pub fn first() -> Self {
        Self {
            title: "Song A",
            artist: "Artist A",
            album: "Album A",
            year: "2020",
            duration: 215,
            url: "https://music.youtube.com/watch?v=aaaa",
            thumbnail: "https://lh3.googleusercontent.com/a",
        }
    }

    pub fn second() -> Self {
        Self {
            title: "Song Y",
            artist: "Artist X",
            album: "Album Y",
            year: "2021",
            duration: 187,
            url: "https://music.youtube.com/watch?v=yyyy",
            thumbnail: "https://lh3.googleusercontent.com/y",
        }
    }
}

/// `artist • album • year`, the way the subtitle row is rendered
pub fn subtitle_row(track: &Track) -> ElementSpec {
    ElementSpec::new("yt-formatted-string")
        .class("byline ytmusic-player-bar")
        .children([
            ElementSpec::new("a").class("yt-formatted-string").text(track.artist),
            ElementSpec::new("span").class("yt-formatted-string").text(" • "),
            ElementSpec::new("a").class("yt-formatted-string").text(track.album),
            ElementSpec::new("span").class("yt-formatted-string").text(" • "),
            ElementSpec::new("span").class("yt-formatted-string").text(track.year),
        ])
}

/// Node handles of a built player page
pub struct PlayerPage {
    pub doc: Document,
    pub player: NodeId,
    pub video: NodeId,
    pub cover: NodeId,
    pub title_link: NodeId,
    pub player_bar: NodeId,
    pub seek_sliders: Vec<NodeId>,
    pub progress_bar: NodeId,
    pub thumbnail: NodeId,
    pub title: NodeId,
    pub subtitle: NodeId,
    pub like_button: NodeId,
    pub volume_slider: NodeId,
}

impl PlayerPage {
    /// A page with `Track::first()` loaded and paused
    pub fn new() -> Self {
        Self::with_track(&Track::first())
    }

    pub fn with_track(track: &Track) -> Self {
        let doc = Document::new();
        let root = doc.root();

        doc.insert(
            root,
            ElementSpec::new("ytmusic-player").id("player").children([
                ElementSpec::new("div")
                    .class("thumbnail ytmusic-player no-transition")
                    .child(
                        ElementSpec::new("img")
                            .class("yt-img-shadow")
                            .attr("src", track.thumbnail),
                    ),
                ElementSpec::new("video").property("paused", "true"),
                ElementSpec::new("a")
                    .class("ytp-title-link yt-uix-sessionlink")
                    .attr("href", track.url),
            ]),
        );

        doc.insert(
            root,
            ElementSpec::new("ytmusic-player-bar")
                .attr("repeat-mode_", "NONE")
                .children([
                    ElementSpec::new("div").class("bar-container").children([
                        ElementSpec::new("div").class("tp-yt-paper-slider"),
                        ElementSpec::new("div").class("tp-yt-paper-slider"),
                        ElementSpec::new("div").class("tp-yt-paper-slider"),
                    ]),
                    ElementSpec::new("tp-yt-paper-slider")
                        .id("progress-bar")
                        .attr("aria-valuemax", track.duration.to_string())
                        .attr("aria-valuenow", "0"),
                    ElementSpec::new("img")
                        .class("image ytmusic-player-bar")
                        .attr("src", track.thumbnail),
                    ElementSpec::new("div").class("content-info-wrapper").children([
                        ElementSpec::new("yt-formatted-string")
                            .class("title ytmusic-player-bar")
                            .text(track.title),
                        ElementSpec::new("span")
                            .class("subtitle ytmusic-player-bar")
                            .child(subtitle_row(track)),
                    ]),
                    ElementSpec::new("ytmusic-like-button-renderer")
                        .id("like-button-renderer")
                        .attr("like-status", "INDIFFERENT"),
                    ElementSpec::new("tp-yt-paper-slider")
                        .id("volume-slider")
                        .attr("value", "40"),
                ]),
        );

        let find = |selector: &str| {
            let selector = Selector::parse(selector).unwrap();
            doc.query_selector(&selector).unwrap()
        };
        let seek_sliders =
            doc.query_selector_all(&Selector::parse(".bar-container .tp-yt-paper-slider").unwrap());

        Self {
            player: find("#player"),
            video: find("video"),
            cover: find(".thumbnail.ytmusic-player.no-transition>.yt-img-shadow"),
            title_link: find(".ytp-title-link"),
            player_bar: find("ytmusic-player-bar"),
            seek_sliders,
            progress_bar: find("#progress-bar"),
            thumbnail: find(".image.ytmusic-player-bar"),
            title: find(".title.ytmusic-player-bar"),
            subtitle: find(".subtitle.ytmusic-player-bar"),
            like_button: find("#like-button-renderer"),
            volume_slider: find("#volume-slider"),
            doc,
        }
    }

    /// Everything the page does when the next track starts
    pub fn change_track(&self, track: &Track) {
        let row = self.doc.instantiate(subtitle_row(track));
        self.doc.replace_children(self.subtitle, &[row]);
        self.doc.set_text_content(self.title, track.title);
        self.doc.set_attribute(self.title_link, "href", track.url);
        self.doc
            .set_attribute(self.progress_bar, "aria-valuemax", track.duration.to_string());
        self.doc.set_attribute(self.progress_bar, "aria-valuenow", "0");
        self.doc.set_attribute(self.cover, "src", track.thumbnail);
        self.doc.set_attribute(self.thumbnail, "src", track.thumbnail);
    }

    /// The `i`th subtitle item of the current row
    pub fn subtitle_item(&self, index: usize) -> NodeId {
        let row = self.doc.children(self.subtitle)[0];
        self.doc.children(row)[index]
    }

    pub fn play(&self) {
        self.doc.set_property(self.video, "paused", "false");
        self.doc.dispatch_event(self.video, Event::new(EventType::Play));
    }

    pub fn pause(&self) {
        self.doc.set_property(self.video, "paused", "true");
        self.doc.dispatch_event(self.video, Event::new(EventType::Pause));
    }

    pub fn player(&self) -> Player {
        Player::new(self.doc.clone()).unwrap()
    }
}

/// Record every change a player publishes
pub fn record(player: &Player) -> Arc<Mutex<Vec<(&'static str, FieldChange)>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_cb = Arc::clone(&seen);
    player.subscribe_all(move |event| seen_cb.lock().push((event.key, event.value.clone())));
    seen
}

/// Recorded changes for one key
pub fn changes_of(seen: &Mutex<Vec<(&'static str, FieldChange)>>, key: &str) -> Vec<FieldChange> {
    seen.lock()
        .iter()
        .filter(|(k, _)| *k == key)
        .map(|(_, value)| value.clone())
        .collect()
}
