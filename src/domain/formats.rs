//! Wire shapes of the external interchange documents.
//!
//! Field names follow what each producing app writes, so unknown fields are
//! ignored on read and optional fields default when absent.

use serde::{Deserialize, Serialize};

use super::config::FrontendConfig;
use super::models::Playlist;

/// YouTube's service id in NewPipe exports.
pub const NEWPIPE_YOUTUBE_SERVICE: i32 = 0;

/// NewPipe `subscriptions.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPipeSubscriptions {
    #[serde(default)]
    pub app_version: String,
    #[serde(default)]
    pub app_version_int: i32,
    pub subscriptions: Vec<NewPipeSubscription>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPipeSubscription {
    #[serde(default)]
    pub service_id: i32,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub name: String,
}

/// FreeTube subscription profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeTubeProfile {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "bgColor", default)]
    pub bg_color: String,
    #[serde(rename = "textColor", default)]
    pub text_color: String,
    pub subscriptions: Vec<FreeTubeSubscription>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeTubeSubscription {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub thumbnail: String,
}

/// Piped playlist export document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipedPlaylistFile {
    #[serde(default = "default_piped_format")]
    pub format: String,
    #[serde(default = "default_piped_version")]
    pub version: i32,
    pub playlists: Vec<PipedPlaylist>,
}

impl PipedPlaylistFile {
    /// Wrap playlists in a document with the current format header.
    #[must_use]
    pub fn new(playlists: Vec<PipedPlaylist>) -> Self {
        Self {
            format: default_piped_format(),
            version: default_piped_version(),
            playlists,
        }
    }
}

fn default_piped_format() -> String {
    "Piped".to_string()
}

const fn default_piped_version() -> i32 {
    1
}

/// Playlist in the native (Piped) export, with full video URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipedPlaylist {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default = "default_playlist_type")]
    pub playlist_type: String,
    #[serde(default = "default_visibility")]
    pub visibility: String,
    #[serde(default)]
    pub videos: Vec<String>,
}

fn default_playlist_type() -> String {
    "playlist".to_string()
}

fn default_visibility() -> String {
    "private".to_string()
}

impl PipedPlaylist {
    /// Private playlist holding the given video URLs.
    #[must_use]
    pub fn new(name: impl Into<String>, videos: Vec<String>) -> Self {
        Self {
            name: name.into(),
            playlist_type: default_playlist_type(),
            visibility: default_visibility(),
            videos,
        }
    }

    /// Native export form of a playlist, with watch URLs on `frontend`.
    #[must_use]
    pub fn from_playlist(playlist: &Playlist, frontend: &FrontendConfig) -> Self {
        Self::new(
            playlist.name.clone(),
            playlist
                .video_ids
                .iter()
                .map(|id| frontend.watch_url(id))
                .collect(),
        )
    }
}

/// FreeTube playlist record, one per line of `playlists.db`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeTubePlaylist {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub playlist_name: String,
    #[serde(default)]
    pub protected: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub videos: Vec<FreeTubeVideo>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub last_updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeTubeVideo {
    #[serde(default)]
    pub video_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub author_id: String,
    #[serde(default)]
    pub length_seconds: i64,
    #[serde(default)]
    pub time_added: i64,
}

impl FreeTubePlaylist {
    /// FreeTube form of a playlist. Video metadata FreeTube keeps but the
    /// library does not is left empty.
    #[must_use]
    pub fn from_playlist(playlist: &Playlist, id: impl Into<String>, timestamp_ms: i64) -> Self {
        Self {
            id: id.into(),
            playlist_name: playlist.name.clone(),
            protected: false,
            description: String::new(),
            videos: playlist
                .video_ids
                .iter()
                .map(|video_id| FreeTubeVideo {
                    video_id: video_id.clone(),
                    title: String::new(),
                    author: String::new(),
                    author_id: String::new(),
                    length_seconds: 0,
                    time_added: timestamp_ms,
                })
                .collect(),
            created_at: timestamp_ms,
            last_updated_at: timestamp_ms,
        }
    }
}

/// One activity record from a Google Takeout `watch-history.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TakeoutActivity {
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub title_url: String,
    #[serde(default)]
    pub subtitles: Vec<TakeoutSubtitle>,
    #[serde(default)]
    pub time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TakeoutSubtitle {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}
