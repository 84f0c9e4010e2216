//! Codec selection by data kind, format and direction.
//!
//! Every supported combination has exactly one row in [`CODECS`]. Anything
//! not in the table is an unsupported-format error.

use crate::domain::{
    AppConfig, AppError, DataKind, Decoded, Direction, FreeTubePlaylist, ImportFormat,
    PipedPlaylist, Playlist, RemoteSubscription, Result, WatchHistoryEntry,
};

use super::{history_codec, playlist_codec, subscription_codec};

pub type SubscriptionDecoder = fn(&str, &AppConfig) -> Result<Decoded<String>>;
pub type SubscriptionEncoder = fn(&[RemoteSubscription], &AppConfig) -> Result<String>;
pub type PlaylistDecoder = fn(&str, &AppConfig) -> Result<Decoded<Playlist>>;
pub type HistoryDecoder = fn(&str, &AppConfig) -> Result<Decoded<WatchHistoryEntry>>;

/// Decoder for one data kind.
#[derive(Clone, Copy)]
pub enum Decoder {
    Subscriptions(SubscriptionDecoder),
    Playlists(PlaylistDecoder),
    WatchHistory(HistoryDecoder),
}

/// Encoder for one data kind. Playlist encoders differ by the shape the
/// playlist store hands out.
#[derive(Clone, Copy)]
pub enum Encoder {
    Subscriptions(SubscriptionEncoder),
    NativePlaylists(fn(&[PipedPlaylist]) -> Result<String>),
    AltPlaylists(fn(&[FreeTubePlaylist]) -> Result<String>),
}

/// One supported format for one data kind.
pub struct CodecEntry {
    pub kind: DataKind,
    pub format: ImportFormat,
    pub decoder: Option<Decoder>,
    pub encoder: Option<Encoder>,
}

pub const CODECS: &[CodecEntry] = &[
    CodecEntry {
        kind: DataKind::Subscriptions,
        format: ImportFormat::NewPipe,
        decoder: Some(Decoder::Subscriptions(subscription_codec::decode_newpipe)),
        encoder: Some(Encoder::Subscriptions(subscription_codec::encode_newpipe)),
    },
    CodecEntry {
        kind: DataKind::Subscriptions,
        format: ImportFormat::FreeTube,
        decoder: Some(Decoder::Subscriptions(subscription_codec::decode_freetube)),
        encoder: Some(Encoder::Subscriptions(subscription_codec::encode_freetube)),
    },
    CodecEntry {
        kind: DataKind::Subscriptions,
        format: ImportFormat::YouTubeCsv,
        decoder: Some(Decoder::Subscriptions(subscription_codec::decode_youtube_csv)),
        encoder: None,
    },
    CodecEntry {
        kind: DataKind::Playlists,
        format: ImportFormat::Piped,
        decoder: Some(Decoder::Playlists(playlist_codec::decode_piped)),
        encoder: Some(Encoder::NativePlaylists(playlist_codec::encode_piped)),
    },
    CodecEntry {
        kind: DataKind::Playlists,
        format: ImportFormat::FreeTube,
        decoder: Some(Decoder::Playlists(playlist_codec::decode_freetube)),
        encoder: Some(Encoder::AltPlaylists(playlist_codec::encode_freetube)),
    },
    CodecEntry {
        kind: DataKind::Playlists,
        format: ImportFormat::YouTubeCsv,
        decoder: Some(Decoder::Playlists(playlist_codec::decode_youtube_csv)),
        encoder: None,
    },
    CodecEntry {
        kind: DataKind::Playlists,
        format: ImportFormat::UrlsOrIds,
        decoder: Some(Decoder::Playlists(playlist_codec::decode_urls)),
        encoder: None,
    },
    CodecEntry {
        kind: DataKind::WatchHistory,
        format: ImportFormat::YouTubeJson,
        decoder: Some(Decoder::WatchHistory(history_codec::decode_youtube_json)),
        encoder: None,
    },
];

fn entry(kind: DataKind, format: ImportFormat) -> Option<&'static CodecEntry> {
    CODECS
        .iter()
        .find(|entry| entry.kind == kind && entry.format == format)
}

/// Whether `format` can be used for `kind` in `direction`.
#[must_use]
pub fn supports(kind: DataKind, format: ImportFormat, direction: Direction) -> bool {
    entry(kind, format).is_some_and(|entry| match direction {
        Direction::Import => entry.decoder.is_some(),
        Direction::Export => entry.encoder.is_some(),
    })
}

/// Decoder for `kind` in `format`.
///
/// # Errors
/// Returns `UnsupportedFormat` if the combination cannot be imported.
pub fn decoder(kind: DataKind, format: ImportFormat) -> Result<Decoder> {
    entry(kind, format)
        .and_then(|entry| entry.decoder)
        .ok_or_else(|| AppError::unsupported(format, kind, Direction::Import))
}

/// Encoder for `kind` in `format`.
///
/// # Errors
/// Returns `UnsupportedFormat` if the combination cannot be exported.
pub fn encoder(kind: DataKind, format: ImportFormat) -> Result<Encoder> {
    entry(kind, format)
        .and_then(|entry| entry.encoder)
        .ok_or_else(|| AppError::unsupported(format, kind, Direction::Export))
}

/// Subscription decoder for `format`.
///
/// # Errors
/// Returns `UnsupportedFormat` if subscriptions cannot be imported from `format`.
pub fn subscription_decoder(format: ImportFormat) -> Result<SubscriptionDecoder> {
    match decoder(DataKind::Subscriptions, format)? {
        Decoder::Subscriptions(decode) => Ok(decode),
        _ => Err(AppError::unsupported(format, DataKind::Subscriptions, Direction::Import)),
    }
}

/// Subscription encoder for `format`.
///
/// # Errors
/// Returns `UnsupportedFormat` if subscriptions cannot be exported to `format`.
pub fn subscription_encoder(format: ImportFormat) -> Result<SubscriptionEncoder> {
    match encoder(DataKind::Subscriptions, format)? {
        Encoder::Subscriptions(encode) => Ok(encode),
        _ => Err(AppError::unsupported(format, DataKind::Subscriptions, Direction::Export)),
    }
}

/// Playlist decoder for `format`.
///
/// # Errors
/// Returns `UnsupportedFormat` if playlists cannot be imported from `format`.
pub fn playlist_decoder(format: ImportFormat) -> Result<PlaylistDecoder> {
    match decoder(DataKind::Playlists, format)? {
        Decoder::Playlists(decode) => Ok(decode),
        _ => Err(AppError::unsupported(format, DataKind::Playlists, Direction::Import)),
    }
}

/// Playlist encoder for `format`, either native or alternate shape.
///
/// # Errors
/// Returns `UnsupportedFormat` if playlists cannot be exported to `format`.
pub fn playlist_encoder(format: ImportFormat) -> Result<Encoder> {
    match encoder(DataKind::Playlists, format)? {
        encode @ (Encoder::NativePlaylists(_) | Encoder::AltPlaylists(_)) => Ok(encode),
        Encoder::Subscriptions(_) => Err(AppError::unsupported(
            format,
            DataKind::Playlists,
            Direction::Export,
        )),
    }
}

/// Watch history decoder for `format`.
///
/// # Errors
/// Returns `UnsupportedFormat` if watch history cannot be imported from `format`.
pub fn history_decoder(format: ImportFormat) -> Result<HistoryDecoder> {
    match decoder(DataKind::WatchHistory, format)? {
        Decoder::WatchHistory(decode) => Ok(decode),
        _ => Err(AppError::unsupported(format, DataKind::WatchHistory, Direction::Import)),
    }
}
