//! Domain layer - canonical records, wire shapes and collaborator ports.
//!
//! This layer contains pure domain models and error types
//! without any external dependencies (DB, IO, etc.).

pub mod config;
pub mod error;
pub mod formats;
pub mod models;
pub mod ports;

pub use config::{AppConfig, FrontendConfig};
pub use error::{AppError, Result};
pub use formats::{
    FreeTubePlaylist, FreeTubeProfile, FreeTubeSubscription, FreeTubeVideo, NewPipeSubscription,
    NewPipeSubscriptions, PipedPlaylist, PipedPlaylistFile, TakeoutActivity,
};
pub use models::{
    channel_path, DataKind, Decoded, Direction, ImportFormat, Playlist, RemoteSubscription,
    Subscription, WatchHistoryEntry, CHANNEL_ID_LEN, VIDEO_ID_LEN,
};
pub use ports::{
    ByteSink, ByteSource, HistoryStore, Notice, Notifier, PlaylistStore, Reader,
    SubscriptionStore, Writer,
};
