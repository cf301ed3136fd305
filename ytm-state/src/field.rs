//! Fields of the now-playing state and their typed change payloads
//!
//! Every field has a stable camelCase key, used as the bus channel name
//! and as the JSON key of the snapshot.

use serde::{Deserialize, Serialize};

/// Repeat mode of the player bar
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum LoopType {
    None,
    All,
    One,
    /// A value the player emitted that is not one of the known modes
    Other(String),
}

impl LoopType {
    pub fn as_str(&self) -> &str {
        match self {
            LoopType::None => "NONE",
            LoopType::All => "ALL",
            LoopType::One => "ONE",
            LoopType::Other(raw) => raw,
        }
    }
}

impl From<&str> for LoopType {
    fn from(raw: &str) -> Self {
        match raw {
            "NONE" => LoopType::None,
            "ALL" => LoopType::All,
            "ONE" => LoopType::One,
            other => LoopType::Other(other.to_string()),
        }
    }
}

impl From<String> for LoopType {
    fn from(raw: String) -> Self {
        LoopType::from(raw.as_str())
    }
}

impl From<LoopType> for String {
    fn from(value: LoopType) -> Self {
        value.as_str().to_string()
    }
}

/// Like state of the current track
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum LikeStatus {
    Like,
    Dislike,
    Indifferent,
    Other(String),
}

impl LikeStatus {
    pub fn as_str(&self) -> &str {
        match self {
            LikeStatus::Like => "LIKE",
            LikeStatus::Dislike => "DISLIKE",
            LikeStatus::Indifferent => "INDIFFERENT",
            LikeStatus::Other(raw) => raw,
        }
    }
}

impl From<&str> for LikeStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "LIKE" => LikeStatus::Like,
            "DISLIKE" => LikeStatus::Dislike,
            "INDIFFERENT" => LikeStatus::Indifferent,
            other => LikeStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for LikeStatus {
    fn from(raw: String) -> Self {
        LikeStatus::from(raw.as_str())
    }
}

impl From<LikeStatus> for String {
    fn from(value: LikeStatus) -> Self {
        value.as_str().to_string()
    }
}

/// Identifies one field of the now-playing state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    IsPlaying,
    IsPaused,
    IsVideo,
    Volume,
    Title,
    Author,
    AlbumName,
    Duration,
    Position,
    Url,
    LoopType,
    CoverUrl,
    LikeStatus,
}

impl Field {
    /// Every field, in snapshot order
    pub const ALL: [Field; 13] = [
        Field::IsPlaying,
        Field::IsPaused,
        Field::IsVideo,
        Field::Volume,
        Field::Title,
        Field::Author,
        Field::AlbumName,
        Field::Duration,
        Field::Position,
        Field::Url,
        Field::LoopType,
        Field::CoverUrl,
        Field::LikeStatus,
    ];

    /// Bus channel name and JSON key
    pub const fn key(self) -> &'static str {
        match self {
            Field::IsPlaying => "isPlaying",
            Field::IsPaused => "isPaused",
            Field::IsVideo => "isVideo",
            Field::Volume => "volume",
            Field::Title => "title",
            Field::Author => "author",
            Field::AlbumName => "albumName",
            Field::Duration => "duration",
            Field::Position => "position",
            Field::Url => "url",
            Field::LoopType => "loopType",
            Field::CoverUrl => "coverUrl",
            Field::LikeStatus => "likeStatus",
        }
    }

    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.key() == key)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// New value of a single field
///
/// `None` means the backing node is currently absent or its value could
/// not be read. Serializes as the bare value, so a bus event renders as
/// `{"key": "volume", "value": 55}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldChange {
    IsPlaying(bool),
    IsPaused(Option<bool>),
    IsVideo(Option<bool>),
    Volume(Option<u8>),
    Title(Option<String>),
    Author(Option<String>),
    AlbumName(Option<String>),
    Duration(Option<u32>),
    Position(Option<u32>),
    Url(Option<String>),
    LoopType(Option<LoopType>),
    CoverUrl(Option<String>),
    LikeStatus(Option<LikeStatus>),
}

impl FieldChange {
    pub fn field(&self) -> Field {
        match self {
            FieldChange::IsPlaying(_) => Field::IsPlaying,
            FieldChange::IsPaused(_) => Field::IsPaused,
            FieldChange::IsVideo(_) => Field::IsVideo,
            FieldChange::Volume(_) => Field::Volume,
            FieldChange::Title(_) => Field::Title,
            FieldChange::Author(_) => Field::Author,
            FieldChange::AlbumName(_) => Field::AlbumName,
            FieldChange::Duration(_) => Field::Duration,
            FieldChange::Position(_) => Field::Position,
            FieldChange::Url(_) => Field::Url,
            FieldChange::LoopType(_) => Field::LoopType,
            FieldChange::CoverUrl(_) => Field::CoverUrl,
            FieldChange::LikeStatus(_) => Field::LikeStatus,
        }
    }

    /// Bus channel name of the changed field
    pub fn key(&self) -> &'static str {
        self.field().key()
    }
}
