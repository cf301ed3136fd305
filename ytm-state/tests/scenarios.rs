//! End-to-end behaviour of a player mirror against a realistic page

mod common;

use std::sync::Arc;
use std::time::Duration;

use page_tree::{EventType, Event};
use parking_lot::Mutex;
use ytm_state::{Field, FieldChange, LikeStatus, LoopType, NowPlaying, StateError};

use common::{changes_of, record, PlayerPage, Track, PLACEHOLDER};

#[test]
fn full_state_reads_the_loaded_track() {
    let page = PlayerPage::new();
    let player = page.player();

    let expected = NowPlaying {
        is_playing: true,
        is_paused: Some(true),
        is_video: Some(false),
        volume: Some(40),
        title: Some("Song A".to_string()),
        author: Some("Artist A".to_string()),
        album_name: Some("Album A".to_string()),
        duration: Some(215),
        position: Some(0),
        url: Some("https://music.youtube.com/watch?v=aaaa".to_string()),
        loop_type: Some(LoopType::None),
        cover_url: Some("https://lh3.googleusercontent.com/a".to_string()),
        like_status: Some(LikeStatus::Indifferent),
    };
    assert_eq!(player.full_state(), expected);
}

#[test]
fn start_attaches_every_watcher() {
    let page = PlayerPage::new();
    let player = page.player();

    let report = player.start().unwrap();
    assert_eq!(report.attached, ytm_state::WATCH_ORDER.to_vec());
    assert!(report.dormant.is_empty());
    assert!(player.is_running());
}

#[test]
fn volume_change_is_published_once() {
    let page = PlayerPage::new();
    let player = page.player();
    let seen = record(&player);
    player.start().unwrap();

    page.doc.set_attribute(page.volume_slider, "value", "55");
    page.doc.flush();

    assert_eq!(*seen.lock(), vec![("volume", FieldChange::Volume(Some(55)))]);
    assert_eq!(player.full_state().volume, Some(55));
}

#[test]
fn track_change_publishes_author_then_album() {
    let page = PlayerPage::new();
    let player = page.player();
    let seen = record(&player);
    player.start().unwrap();

    page.change_track(&Track::second());
    page.doc.flush();

    assert_eq!(
        changes_of(&seen, "author"),
        vec![FieldChange::Author(Some("Artist X".to_string()))]
    );
    assert_eq!(
        changes_of(&seen, "albumName"),
        vec![FieldChange::AlbumName(Some("Album Y".to_string()))]
    );

    let keys: Vec<&str> = seen.lock().iter().map(|(key, _)| *key).collect();
    let author = keys.iter().position(|k| *k == "author").unwrap();
    let album = keys.iter().position(|k| *k == "albumName").unwrap();
    assert!(author < album);

    assert_eq!(changes_of(&seen, "isPlaying"), vec![FieldChange::IsPlaying(true)]);
    assert_eq!(changes_of(&seen, "title"), vec![FieldChange::Title(Some("Song Y".to_string()))]);
    assert_eq!(changes_of(&seen, "duration"), vec![FieldChange::Duration(Some(187))]);
    // position was already 0
    assert!(changes_of(&seen, "position").is_empty());
}

#[test]
fn in_place_subtitle_edit_is_published() {
    let page = PlayerPage::new();
    let player = page.player();
    let seen = record(&player);
    player.start().unwrap();

    page.doc.set_text_content(page.subtitle_item(2), "Album A (Deluxe)");
    page.doc.flush();

    assert_eq!(
        changes_of(&seen, "albumName"),
        vec![FieldChange::AlbumName(Some("Album A (Deluxe)".to_string()))]
    );
    assert!(changes_of(&seen, "author").is_empty());
}

#[test]
fn pause_signals_follow_the_media_element() {
    let page = PlayerPage::new();
    let player = page.player();
    let seen = record(&player);
    player.start().unwrap();

    page.play();
    page.play();
    page.pause();

    assert_eq!(
        changes_of(&seen, "isPaused"),
        vec![FieldChange::IsPaused(Some(false)), FieldChange::IsPaused(Some(true))]
    );
    assert_eq!(player.full_state().is_paused, Some(true));
}

#[test]
fn video_mode_cover_falls_back_to_thumbnail() {
    let page = PlayerPage::new();
    let player = page.player();
    let seen = record(&player);
    player.start().unwrap();

    page.doc.set_attribute(page.player, "video-mode_", "");
    page.doc.set_attribute(page.cover, "src", "data:image/jpeg;base64,/9j/4AAQ");
    page.doc.set_attribute(page.thumbnail, "src", PLACEHOLDER);
    page.doc.flush();

    assert_eq!(changes_of(&seen, "isVideo"), vec![FieldChange::IsVideo(Some(true))]);
    assert_eq!(changes_of(&seen, "coverUrl"), vec![FieldChange::CoverUrl(None)]);
    assert_eq!(player.full_state().cover_url, None);

    page.doc.set_attribute(page.thumbnail, "src", "https://i.ytimg.com/vi/yyyy/sddefault.jpg");
    page.doc.flush();
    assert_eq!(
        player.full_state().cover_url.as_deref(),
        Some("https://i.ytimg.com/vi/yyyy/sddefault.jpg")
    );
    assert_eq!(changes_of(&seen, "coverUrl").len(), 2);
}

#[test]
fn enum_attributes_keep_raw_values() {
    let page = PlayerPage::new();
    let player = page.player();
    let seen = record(&player);
    player.start().unwrap();

    page.doc.set_attribute(page.player_bar, "repeat-mode_", "ONE");
    page.doc.set_attribute(page.like_button, "like-status", "LIKE");
    page.doc.flush();
    page.doc.set_attribute(page.player_bar, "repeat-mode_", "SHUFFLE_ALL");
    page.doc.flush();

    assert_eq!(
        changes_of(&seen, "loopType"),
        vec![
            FieldChange::LoopType(Some(LoopType::One)),
            FieldChange::LoopType(Some(LoopType::Other("SHUFFLE_ALL".to_string()))),
        ]
    );
    assert_eq!(
        changes_of(&seen, "likeStatus"),
        vec![FieldChange::LikeStatus(Some(LikeStatus::Like))]
    );
}

#[test]
fn field_subscription_only_sees_its_field() {
    let page = PlayerPage::new();
    let player = page.player();
    let volumes = Arc::new(Mutex::new(Vec::new()));
    let volumes_cb = Arc::clone(&volumes);
    let sub = player.subscribe(Field::Volume, move |event| volumes_cb.lock().push(event.value.clone()));
    player.start().unwrap();

    page.doc.set_attribute(page.volume_slider, "value", "10");
    page.doc.set_attribute(page.progress_bar, "aria-valuenow", "12");
    page.doc.flush();
    assert_eq!(*volumes.lock(), vec![FieldChange::Volume(Some(10))]);

    sub.unsubscribe();
    page.doc.set_attribute(page.volume_slider, "value", "20");
    page.doc.flush();
    assert_eq!(volumes.lock().len(), 1);
}

#[test]
fn iterator_receives_wildcard_stream() {
    let page = PlayerPage::new();
    let player = page.player();
    let changes = player.iter();
    player.start().unwrap();

    page.doc.set_attribute(page.progress_bar, "aria-valuenow", "33");
    page.doc.flush();

    let event = changes.recv_timeout(Duration::from_millis(100)).unwrap();
    assert_eq!(event.key, "position");
    assert_eq!(event.value, FieldChange::Position(Some(33)));
    assert!(changes.try_recv().is_none());

    drop(changes);
    assert_eq!(player.bus().subscriber_count(ytm_state::WILDCARD), 0);
}

#[test]
fn missing_nodes_leave_watchers_dormant() {
    let page = PlayerPage::new();
    page.doc.remove(page.video);
    page.doc.remove(page.like_button);
    let player = page.player();
    let seen = record(&player);

    let report = player.start().unwrap();
    assert_eq!(report.dormant, vec![Field::IsPaused, Field::LikeStatus]);
    assert_eq!(player.full_state().is_paused, None);

    // Re-inserting the node later does not wake the watcher
    page.doc.append_child(page.player_bar, page.like_button);
    page.doc.set_attribute(page.like_button, "like-status", "DISLIKE");
    page.doc.flush();
    assert!(changes_of(&seen, "likeStatus").is_empty());
    assert_eq!(player.full_state().like_status, Some(LikeStatus::Dislike));
}

#[test]
fn start_twice_is_an_error() {
    let page = PlayerPage::new();
    let player = page.player();

    player.start().unwrap();
    assert!(matches!(player.start(), Err(StateError::AlreadyRunning)));
}

#[test]
fn stop_detaches_and_restart_rebaselines() {
    let page = PlayerPage::new();
    let player = page.player();
    let seen = record(&player);
    player.start().unwrap();

    page.doc.set_attribute(page.volume_slider, "value", "41");
    assert_eq!(player.stop(), ytm_state::WATCH_ORDER.len());
    assert_eq!(page.doc.observer_count(), 0);
    assert_eq!(page.doc.listener_count(), 0);

    page.doc.flush();
    assert!(seen.lock().is_empty());

    player.start().unwrap();
    page.doc.set_attribute(page.volume_slider, "value", "41");
    page.doc.flush();
    assert!(seen.lock().is_empty());

    page.doc.set_attribute(page.volume_slider, "value", "42");
    page.doc.flush();
    assert_eq!(*seen.lock(), vec![("volume", FieldChange::Volume(Some(42)))]);
}

#[test]
fn stop_from_a_callback() {
    let page = PlayerPage::new();
    let player = Arc::new(page.player());
    let weak = Arc::downgrade(&player);
    player.subscribe(Field::Volume, move |_| {
        if let Some(player) = weak.upgrade() {
            player.stop();
        }
    });
    player.start().unwrap();

    page.doc.set_attribute(page.volume_slider, "value", "60");
    page.doc.flush();
    assert!(!player.is_running());
}

#[test]
fn dropping_the_player_detaches_watchers() {
    let page = PlayerPage::new();
    {
        let player = page.player();
        player.start().unwrap();
        assert!(page.doc.observer_count() > 0);
    }
    assert_eq!(page.doc.observer_count(), 0);
    assert_eq!(page.doc.listener_count(), 0);
}

#[test]
fn set_volume_round_trips_through_the_watcher() {
    let page = PlayerPage::new();
    let player = page.player();
    let seen = record(&player);
    let commits = Arc::new(Mutex::new(0));
    let commits_cb = Arc::clone(&commits);
    page.doc
        .add_event_listener(page.volume_slider, EventType::Change, move |_, _, _| *commits_cb.lock() += 1);
    player.start().unwrap();

    assert!(player.set_volume(70));
    page.doc.flush();

    assert_eq!(*commits.lock(), 1);
    assert_eq!(changes_of(&seen, "volume"), vec![FieldChange::Volume(Some(70))]);
}

#[test]
fn set_position_clicks_the_seek_slider() {
    let page = PlayerPage::new();
    let player = page.player();
    let clicked = Arc::new(Mutex::new(Vec::new()));
    let clicked_cb = Arc::clone(&clicked);
    page.doc.add_event_listener(page.doc.root(), EventType::Click, move |_, target, _| {
        clicked_cb.lock().push(target);
    });

    assert!(player.set_position(95));
    assert_eq!(*clicked.lock(), vec![page.seek_sliders[2]]);
    assert_eq!(page.doc.attribute(page.progress_bar, "value").as_deref(), Some("95"));
}

#[test]
fn set_position_needs_both_targets() {
    let page = PlayerPage::new();
    page.doc.remove(page.seek_sliders[0]);
    let player = page.player();

    assert!(!player.set_position(95));
    assert_eq!(page.doc.attribute(page.progress_bar, "value"), None);
}

#[test]
fn transport_commands_send_shortcuts() {
    let page = PlayerPage::new();
    let player = page.player();
    let keys = Arc::new(Mutex::new(Vec::new()));
    let keys_cb = Arc::clone(&keys);
    page.doc.add_event_listener(page.doc.root(), EventType::KeyDown, move |event: &Event, _, _| {
        keys_cb.lock().push(event.key.clone().unwrap_or_default());
    });

    player.play_pause();
    player.next_track();
    player.prev_track();

    assert_eq!(*keys.lock(), vec![";", "j", "k"]);
}
