//! Collaborator interfaces consumed by the transcoding facade.
//!
//! Streams, stores and the user notification channel are all external; the
//! facade only ever talks to them through these traits.

use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};

use super::error::Result;
use super::formats::{FreeTubePlaylist, PipedPlaylist};
use super::models::{DataKind, Playlist, RemoteSubscription, WatchHistoryEntry};

/// Readable byte stream handed out by a [`ByteSource`].
pub type Reader = Box<dyn AsyncRead + Send + Unpin>;

/// Writable byte stream handed out by a [`ByteSink`].
pub type Writer = Box<dyn AsyncWrite + Send + Unpin>;

/// Opens readable streams. `None` means the locator is unavailable.
#[async_trait]
pub trait ByteSource: Send + Sync {
    async fn open(&self, locator: &Path) -> Result<Option<Reader>>;
}

/// Opens writable streams. `None` means the locator is unavailable.
#[async_trait]
pub trait ByteSink: Send + Sync {
    async fn open(&self, locator: &Path) -> Result<Option<Writer>>;
}

/// Subscription persistence.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Subscribe to the given channel IDs.
    async fn submit(&self, channel_ids: &[String]) -> Result<()>;

    /// All current subscriptions with relative channel URLs.
    async fn fetch_all(&self, auth_token: Option<&str>) -> Result<Vec<RemoteSubscription>>;
}

/// Playlist persistence.
#[async_trait]
pub trait PlaylistStore: Send + Sync {
    /// Store the given playlists as one batch.
    async fn submit(&self, playlists: &[Playlist]) -> Result<()>;

    /// All playlists in the native export shape.
    async fn fetch_all_native(&self) -> Result<Vec<PipedPlaylist>>;

    /// All playlists in the alternate app's shape.
    async fn fetch_all_alt_format(&self) -> Result<Vec<FreeTubePlaylist>>;
}

/// Append-only watch history.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append(&self, entry: &WatchHistoryEntry) -> Result<()>;
}

/// User-facing notices emitted once per facade call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Import finished with this many records.
    Imported { kind: DataKind, count: usize },
    /// Export finished with this many records.
    Exported { kind: DataKind, count: usize },
    /// The input held no usable records.
    NothingFound { kind: DataKind },
    /// The input stream could not be opened.
    SourceUnavailable { locator: String },
    /// The operation failed.
    Failed { message: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Imported { kind, count } => write!(f, "Imported {count} {kind}"),
            Self::Exported { kind, count } => write!(f, "Exported {count} {kind}"),
            Self::NothingFound { kind } => write!(f, "No {kind} found"),
            Self::SourceUnavailable { locator } => write!(f, "Could not open {locator}"),
            Self::Failed { message } => write!(f, "{message}"),
        }
    }
}

/// Fire-and-forget user notification.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}
