//! Domain models for subscriptions, playlists and watch history.
//!
//! These are the canonical, format-agnostic records every codec decodes into
//! and encodes from.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::AppError;

/// Length of a normalized video ID.
pub const VIDEO_ID_LEN: usize = 11;

/// Length of a normalized channel ID.
pub const CHANNEL_ID_LEN: usize = 24;

/// A channel subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Display name of the channel.
    pub name: String,
    /// 24-character channel ID.
    pub channel_id: String,
}

impl Subscription {
    /// Relative channel path as served by the front-end, e.g. `/channel/UC...`.
    #[must_use]
    pub fn url(&self) -> String {
        channel_path(&self.channel_id)
    }
}

/// Subscription as returned by the subscription store: a name and a relative URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSubscription {
    pub name: String,
    pub url: String,
}

impl From<&Subscription> for RemoteSubscription {
    fn from(sub: &Subscription) -> Self {
        Self {
            name: sub.name.clone(),
            url: sub.url(),
        }
    }
}

/// A named, ordered list of videos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Playlist name.
    pub name: String,
    /// 11-character video IDs in source order.
    pub video_ids: Vec<String>,
}

impl Playlist {
    /// Create a playlist with the given name and videos.
    #[must_use]
    pub fn new(name: impl Into<String>, video_ids: Vec<String>) -> Self {
        Self {
            name: name.into(),
            video_ids,
        }
    }
}

/// A single watched video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchHistoryEntry {
    /// 11-character video ID.
    pub video_id: String,
    /// Video title without the "Watched " prefix.
    pub title: String,
    /// Uploader display name.
    #[serde(default)]
    pub uploader: Option<String>,
    /// Relative uploader channel path, `/channel/<24 chars>`.
    #[serde(default)]
    pub uploader_url: Option<String>,
    /// Thumbnail URL synthesized from the video ID.
    pub thumbnail_url: String,
    /// When the video was watched, if the source recorded it.
    #[serde(default)]
    pub watched_at: Option<DateTime<Utc>>,
}

impl WatchHistoryEntry {
    /// Uploader channel ID, recovered from `uploader_url`.
    #[must_use]
    pub fn uploader_channel_id(&self) -> Option<&str> {
        self.uploader_url
            .as_deref()
            .and_then(|url| url.strip_prefix("/channel/"))
    }
}

/// Format a channel ID as a relative channel path.
#[must_use]
pub fn channel_path(channel_id: &str) -> String {
    format!("/channel/{channel_id}")
}

/// The kind of user data being transcoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    Subscriptions,
    Playlists,
    WatchHistory,
}

impl DataKind {
    /// All kinds, in display order.
    pub const ALL: [Self; 3] = [Self::Subscriptions, Self::Playlists, Self::WatchHistory];

    /// Name used in generated file names.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Subscriptions => "subscriptions",
            Self::Playlists => "playlists",
            Self::WatchHistory => "watch-history",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Subscriptions => write!(f, "subscriptions"),
            Self::Playlists => write!(f, "playlists"),
            Self::WatchHistory => write!(f, "watch history"),
        }
    }
}

impl FromStr for DataKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "subscriptions" | "subs" => Ok(Self::Subscriptions),
            "playlists" => Ok(Self::Playlists),
            "history" | "watch-history" => Ok(Self::WatchHistory),
            _ => Err(AppError::InvalidArgument {
                message: format!("Unknown data kind: {s}. Use: subscriptions, playlists, history"),
            }),
        }
    }
}

/// Whether data flows into the library or out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Import,
    Export,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Import => write!(f, "import"),
            Self::Export => write!(f, "export"),
        }
    }
}

/// External encoding of an import or export file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportFormat {
    /// NewPipe subscription export.
    NewPipe,
    /// FreeTube subscription profile or playlist database.
    FreeTube,
    /// Google Takeout CSV.
    YouTubeCsv,
    /// Google Takeout JSON activity export.
    YouTubeJson,
    /// Piped playlist export.
    Piped,
    /// Plain list of video URLs or IDs.
    UrlsOrIds,
}

impl ImportFormat {
    /// All formats, in display order.
    pub const ALL: [Self; 6] = [
        Self::NewPipe,
        Self::FreeTube,
        Self::YouTubeCsv,
        Self::YouTubeJson,
        Self::Piped,
        Self::UrlsOrIds,
    ];

    /// Name used on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NewPipe => "newpipe",
            Self::FreeTube => "freetube",
            Self::YouTubeCsv => "youtube-csv",
            Self::YouTubeJson => "youtube-json",
            Self::Piped => "piped",
            Self::UrlsOrIds => "urls",
        }
    }

    /// MIME type of files in this format.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::YouTubeCsv => "text/csv",
            Self::UrlsOrIds => "text/plain",
            Self::NewPipe | Self::FreeTube | Self::YouTubeJson | Self::Piped => "application/json",
        }
    }

    /// File extension matching the MIME type.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::YouTubeCsv => "csv",
            Self::UrlsOrIds => "txt",
            Self::NewPipe | Self::FreeTube | Self::YouTubeJson | Self::Piped => "json",
        }
    }
}

impl fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ImportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.name() == lowered)
            .ok_or_else(|| AppError::InvalidArgument {
                message: format!(
                    "Unknown format: {s}. Use: {}",
                    Self::ALL.map(Self::name).join(", ")
                ),
            })
    }
}

/// Records decoded from a file plus the number of rows that were skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

impl<T> Decoded<T> {
    /// Wrap records with a skip count.
    #[must_use]
    pub const fn new(records: Vec<T>, skipped: usize) -> Self {
        Self { records, skipped }
    }

    /// Whether nothing usable was decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T> Default for Decoded<T> {
    fn default() -> Self {
        Self::new(Vec::new(), 0)
    }
}
