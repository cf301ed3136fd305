//! The now-playing snapshot

use serde::{Deserialize, Serialize};

use crate::field::{Field, FieldChange, LikeStatus, LoopType};

/// Aggregate view of the player bar at one point in time
///
/// Built in one go by [`crate::SnapshotReader::full_state`], or kept up to
/// date by folding bus events onto a previous snapshot with [`apply`].
///
/// [`apply`]: NowPlaying::apply
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NowPlaying {
    pub is_playing: bool,
    pub is_paused: Option<bool>,
    pub is_video: Option<bool>,
    pub volume: Option<u8>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub album_name: Option<String>,
    pub duration: Option<u32>,
    pub position: Option<u32>,
    pub url: Option<String>,
    pub loop_type: Option<LoopType>,
    pub cover_url: Option<String>,
    pub like_status: Option<LikeStatus>,
}

impl NowPlaying {
    /// Fold one field update onto the snapshot
    pub fn apply(&mut self, change: &FieldChange) {
        match change.clone() {
            FieldChange::IsPlaying(v) => self.is_playing = v,
            FieldChange::IsPaused(v) => self.is_paused = v,
            FieldChange::IsVideo(v) => self.is_video = v,
            FieldChange::Volume(v) => self.volume = v,
            FieldChange::Title(v) => self.title = v,
            FieldChange::Author(v) => self.author = v,
            FieldChange::AlbumName(v) => self.album_name = v,
            FieldChange::Duration(v) => self.duration = v,
            FieldChange::Position(v) => self.position = v,
            FieldChange::Url(v) => self.url = v,
            FieldChange::LoopType(v) => self.loop_type = v,
            FieldChange::CoverUrl(v) => self.cover_url = v,
            FieldChange::LikeStatus(v) => self.like_status = v,
        }
    }

    /// Project one field back out as a change payload
    pub fn get(&self, field: Field) -> FieldChange {
        match field {
            Field::IsPlaying => FieldChange::IsPlaying(self.is_playing),
            Field::IsPaused => FieldChange::IsPaused(self.is_paused),
            Field::IsVideo => FieldChange::IsVideo(self.is_video),
            Field::Volume => FieldChange::Volume(self.volume),
            Field::Title => FieldChange::Title(self.title.clone()),
            Field::Author => FieldChange::Author(self.author.clone()),
            Field::AlbumName => FieldChange::AlbumName(self.album_name.clone()),
            Field::Duration => FieldChange::Duration(self.duration),
            Field::Position => FieldChange::Position(self.position),
            Field::Url => FieldChange::Url(self.url.clone()),
            Field::LoopType => FieldChange::LoopType(self.loop_type.clone()),
            Field::CoverUrl => FieldChange::CoverUrl(self.cover_url.clone()),
            Field::LikeStatus => FieldChange::LikeStatus(self.like_status.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_then_get() {
        let mut state = NowPlaying::default();
        state.apply(&FieldChange::Volume(Some(55)));
        state.apply(&FieldChange::AlbumName(Some("Album Y".to_string())));

        assert_eq!(state.volume, Some(55));
        assert_eq!(state.get(Field::Volume), FieldChange::Volume(Some(55)));
        assert_eq!(
            state.get(Field::AlbumName),
            FieldChange::AlbumName(Some("Album Y".to_string()))
        );
    }

    #[test]
    fn test_get_covers_every_field() {
        let state = NowPlaying::default();
        for field in Field::ALL {
            assert_eq!(state.get(field).field(), field);
        }
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let state = NowPlaying {
            is_playing: true,
            loop_type: Some(LoopType::All),
            ..Default::default()
        };
        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["isPlaying"], serde_json::json!(true));
        assert_eq!(json["loopType"], serde_json::json!("ALL"));
        assert_eq!(json["albumName"], serde_json::Value::Null);

        let back: NowPlaying = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }
}
