//! Import and export entry points.
//!
//! Each call reads or writes one stream, runs the codec picked by the
//! dispatcher, hands records to or from a store, and reports the result to
//! the user exactly once. Errors never escape: they become a failure notice
//! and a [`Outcome::Failed`] return value.

use std::path::Path;

use chrono::{DateTime, Utc};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::domain::{
    AppConfig, AppError, ByteSink, ByteSource, DataKind, Direction, HistoryStore, ImportFormat,
    Notice, Notifier, PlaylistStore, Result, SubscriptionStore,
};

use super::dispatcher::{self, Encoder};

/// Result of one import or export call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Records were transferred.
    Completed { count: usize },
    /// The input decoded but held no usable records.
    Empty,
    /// The stream could not be opened.
    Unavailable,
    /// The call failed; `message` was shown to the user.
    Failed { message: String },
}

/// External collaborators used by the [`Transcoder`].
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub source: &'a dyn ByteSource,
    pub sink: &'a dyn ByteSink,
    pub subscriptions: &'a dyn SubscriptionStore,
    pub playlists: &'a dyn PlaylistStore,
    pub history: &'a dyn HistoryStore,
    pub notifier: &'a dyn Notifier,
}

/// Facade over the codecs and collaborators.
pub struct Transcoder<'a> {
    config: &'a AppConfig,
    io: Collaborators<'a>,
}

impl<'a> Transcoder<'a> {
    /// Create a transcoder over the given collaborators.
    #[must_use]
    pub const fn new(config: &'a AppConfig, io: Collaborators<'a>) -> Self {
        Self { config, io }
    }

    /// Import channel subscriptions from `locator`.
    pub async fn import_subscriptions(&self, format: ImportFormat, locator: &Path) -> Outcome {
        let result = self.try_import_subscriptions(format, locator).await;
        self.report(DataKind::Subscriptions, Direction::Import, locator, result)
    }

    /// Export all subscriptions to `locator`.
    pub async fn export_subscriptions(&self, format: ImportFormat, locator: &Path) -> Outcome {
        let result = self.try_export_subscriptions(format, locator).await;
        self.report(DataKind::Subscriptions, Direction::Export, locator, result)
    }

    /// Import playlists from `locator`.
    pub async fn import_playlists(&self, format: ImportFormat, locator: &Path) -> Outcome {
        let result = self.try_import_playlists(format, locator).await;
        self.report(DataKind::Playlists, Direction::Import, locator, result)
    }

    /// Export all playlists to `locator`.
    pub async fn export_playlists(&self, format: ImportFormat, locator: &Path) -> Outcome {
        let result = self.try_export_playlists(format, locator).await;
        self.report(DataKind::Playlists, Direction::Export, locator, result)
    }

    /// Import watch history from `locator`, appending oldest first.
    pub async fn import_watch_history(&self, format: ImportFormat, locator: &Path) -> Outcome {
        let result = self.try_import_watch_history(format, locator).await;
        self.report(DataKind::WatchHistory, Direction::Import, locator, result)
    }

    /// Import `kind` from `locator`.
    pub async fn import(&self, kind: DataKind, format: ImportFormat, locator: &Path) -> Outcome {
        match kind {
            DataKind::Subscriptions => self.import_subscriptions(format, locator).await,
            DataKind::Playlists => self.import_playlists(format, locator).await,
            DataKind::WatchHistory => self.import_watch_history(format, locator).await,
        }
    }

    /// Export `kind` to `locator`. Watch history has no export format and
    /// always fails without touching `locator`.
    pub async fn export(&self, kind: DataKind, format: ImportFormat, locator: &Path) -> Outcome {
        match kind {
            DataKind::Subscriptions => self.export_subscriptions(format, locator).await,
            DataKind::Playlists => self.export_playlists(format, locator).await,
            DataKind::WatchHistory => self.report(
                kind,
                Direction::Export,
                locator,
                Err(AppError::unsupported(format, kind, Direction::Export)),
            ),
        }
    }

    async fn try_import_subscriptions(
        &self,
        format: ImportFormat,
        locator: &Path,
    ) -> Result<Outcome> {
        let decode = dispatcher::subscription_decoder(format)?;
        let Some(text) = self.read_text(locator).await? else {
            return Ok(Outcome::Unavailable);
        };

        let decoded = decode(&text, self.config)?;
        log_skipped(DataKind::Subscriptions, decoded.skipped);
        if decoded.is_empty() {
            return Ok(Outcome::Empty);
        }

        self.io.subscriptions.submit(&decoded.records).await?;
        Ok(Outcome::Completed {
            count: decoded.records.len(),
        })
    }

    async fn try_export_subscriptions(
        &self,
        format: ImportFormat,
        locator: &Path,
    ) -> Result<Outcome> {
        let encode = dispatcher::subscription_encoder(format)?;
        let subscriptions = self
            .io
            .subscriptions
            .fetch_all(self.config.account.auth_token.as_deref())
            .await?;

        let text = encode(&subscriptions, self.config)?;
        self.write_text(locator, &text).await.map(|written| {
            if written {
                Outcome::Completed {
                    count: subscriptions.len(),
                }
            } else {
                Outcome::Unavailable
            }
        })
    }

    async fn try_import_playlists(&self, format: ImportFormat, locator: &Path) -> Result<Outcome> {
        let decode = dispatcher::playlist_decoder(format)?;
        let Some(text) = self.read_text(locator).await? else {
            return Ok(Outcome::Unavailable);
        };

        let decoded = decode(&text, self.config)?;
        log_skipped(DataKind::Playlists, decoded.skipped);
        if decoded.is_empty() {
            return Ok(Outcome::Empty);
        }

        self.io.playlists.submit(&decoded.records).await?;
        Ok(Outcome::Completed {
            count: decoded.records.len(),
        })
    }

    async fn try_export_playlists(&self, format: ImportFormat, locator: &Path) -> Result<Outcome> {
        let (text, count) = match dispatcher::playlist_encoder(format)? {
            Encoder::NativePlaylists(encode) => {
                let playlists = self.io.playlists.fetch_all_native().await?;
                (encode(&playlists)?, playlists.len())
            }
            Encoder::AltPlaylists(encode) => {
                let playlists = self.io.playlists.fetch_all_alt_format().await?;
                (encode(&playlists)?, playlists.len())
            }
            Encoder::Subscriptions(_) => {
                return Err(AppError::unsupported(
                    format,
                    DataKind::Playlists,
                    Direction::Export,
                ))
            }
        };

        let written = self.write_text(locator, &text).await?;
        Ok(if written {
            Outcome::Completed { count }
        } else {
            Outcome::Unavailable
        })
    }

    async fn try_import_watch_history(
        &self,
        format: ImportFormat,
        locator: &Path,
    ) -> Result<Outcome> {
        let decode = dispatcher::history_decoder(format)?;
        let Some(text) = self.read_text(locator).await? else {
            return Ok(Outcome::Unavailable);
        };

        let decoded = decode(&text, self.config)?;
        log_skipped(DataKind::WatchHistory, decoded.skipped);
        if decoded.is_empty() {
            return Ok(Outcome::Empty);
        }

        for entry in &decoded.records {
            self.io.history.append(entry).await?;
        }

        Ok(Outcome::Completed {
            count: decoded.records.len(),
        })
    }

    /// Reads the whole stream as UTF-8. `None` if the source is unavailable.
    async fn read_text(&self, locator: &Path) -> Result<Option<String>> {
        let Some(mut reader) = self.io.source.open(locator).await? else {
            return Ok(None);
        };

        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .await
            .map_err(|e| AppError::io(format!("Failed to read {}", locator.display()), e))?;

        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| AppError::decode("File is not valid UTF-8", e))
    }

    /// Writes and closes the stream. `false` if the sink is unavailable.
    async fn write_text(&self, locator: &Path, text: &str) -> Result<bool> {
        let Some(mut writer) = self.io.sink.open(locator).await? else {
            return Ok(false);
        };

        let context = || format!("Failed to write {}", locator.display());
        writer
            .write_all(text.as_bytes())
            .await
            .map_err(|e| AppError::io(context(), e))?;
        writer.flush().await.map_err(|e| AppError::io(context(), e))?;
        writer
            .shutdown()
            .await
            .map_err(|e| AppError::io(context(), e))?;

        Ok(true)
    }

    /// Turns a call result into an [`Outcome`] and sends the matching notice.
    fn report(
        &self,
        kind: DataKind,
        direction: Direction,
        locator: &Path,
        result: Result<Outcome>,
    ) -> Outcome {
        let outcome = result.unwrap_or_else(|e| {
            tracing::warn!(%kind, %direction, error = %e, "Transcoding failed");
            Outcome::Failed {
                message: e.to_string(),
            }
        });

        let notice = match (&outcome, direction) {
            (Outcome::Completed { count }, Direction::Import) => {
                tracing::info!(%kind, count, "Import completed");
                Some(Notice::Imported { kind, count: *count })
            }
            (Outcome::Completed { count }, Direction::Export) => {
                tracing::info!(%kind, count, path = %locator.display(), "Export completed");
                Some(Notice::Exported { kind, count: *count })
            }
            (Outcome::Empty, _) => Some(Notice::NothingFound { kind }),
            (Outcome::Unavailable, Direction::Import) => {
                tracing::warn!(path = %locator.display(), "Import source unavailable");
                Some(Notice::SourceUnavailable {
                    locator: locator.display().to_string(),
                })
            }
            (Outcome::Unavailable, Direction::Export) => {
                tracing::warn!(path = %locator.display(), "Export target unavailable, nothing written");
                None
            }
            (Outcome::Failed { message }, _) => Some(Notice::Failed {
                message: message.clone(),
            }),
        };

        if let Some(notice) = notice {
            self.io.notifier.notify(notice);
        }

        outcome
    }
}

/// Default export file name, e.g. `playlists-20240301-101500.json`.
#[must_use]
pub fn export_file_name(kind: DataKind, format: ImportFormat, at: DateTime<Utc>) -> String {
    format!(
        "{}-{}.{}",
        kind.slug(),
        at.format("%Y%m%d-%H%M%S"),
        format.extension()
    )
}

fn log_skipped(kind: DataKind, skipped: usize) {
    if skipped > 0 {
        tracing::debug!(%kind, skipped, "Skipped malformed rows");
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::TimeZone;
    use tempfile::tempdir;

    use super::*;
    use crate::domain::{
        FreeTubePlaylist, PipedPlaylist, Playlist, RemoteSubscription, WatchHistoryEntry,
    };
    use crate::infrastructure::{FileSink, FileSource};

    const CHANNEL: &str = "UCuAXFkgsw1L7xaCfnd5JJOw";

    #[derive(Default)]
    struct MemoryStore {
        channel_ids: Mutex<Vec<String>>,
        playlists: Mutex<Vec<Playlist>>,
        history: Mutex<Vec<WatchHistoryEntry>>,
    }

    #[async_trait]
    impl SubscriptionStore for MemoryStore {
        async fn submit(&self, channel_ids: &[String]) -> Result<()> {
            self.channel_ids.lock().unwrap().extend_from_slice(channel_ids);
            Ok(())
        }

        async fn fetch_all(&self, _auth_token: Option<&str>) -> Result<Vec<RemoteSubscription>> {
            Ok(self
                .channel_ids
                .lock()
                .unwrap()
                .iter()
                .map(|id| RemoteSubscription {
                    name: format!("Channel {id}"),
                    url: format!("/channel/{id}"),
                })
                .collect())
        }
    }

    #[async_trait]
    impl PlaylistStore for MemoryStore {
        async fn submit(&self, playlists: &[Playlist]) -> Result<()> {
            self.playlists.lock().unwrap().extend_from_slice(playlists);
            Ok(())
        }

        async fn fetch_all_native(&self) -> Result<Vec<PipedPlaylist>> {
            let frontend = AppConfig::default().frontend;
            Ok(self
                .playlists
                .lock()
                .unwrap()
                .iter()
                .map(|p| PipedPlaylist::from_playlist(p, &frontend))
                .collect())
        }

        async fn fetch_all_alt_format(&self) -> Result<Vec<FreeTubePlaylist>> {
            Ok(self
                .playlists
                .lock()
                .unwrap()
                .iter()
                .enumerate()
                .map(|(i, p)| FreeTubePlaylist::from_playlist(p, i.to_string(), 0))
                .collect())
        }
    }

    #[async_trait]
    impl HistoryStore for MemoryStore {
        async fn append(&self, entry: &WatchHistoryEntry) -> Result<()> {
            self.history.lock().unwrap().push(entry.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        notices: Mutex<Vec<Notice>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notice: Notice) {
            self.notices.lock().unwrap().push(notice);
        }
    }

    struct Harness {
        config: AppConfig,
        store: MemoryStore,
        notifier: RecordingNotifier,
        source: FileSource,
        sink: FileSink,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                config: AppConfig::default(),
                store: MemoryStore::default(),
                notifier: RecordingNotifier::default(),
                source: FileSource,
                sink: FileSink,
            }
        }

        fn transcoder(&self) -> Transcoder<'_> {
            Transcoder::new(
                &self.config,
                Collaborators {
                    source: &self.source,
                    sink: &self.sink,
                    subscriptions: &self.store,
                    playlists: &self.store,
                    history: &self.store,
                    notifier: &self.notifier,
                },
            )
        }

        fn notices(&self) -> Vec<Notice> {
            self.notifier.notices.lock().unwrap().clone()
        }
    }

    fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_import_csv_subscriptions() {
        let dir = tempdir().unwrap();
        let path = write_fixture(
            dir.path(),
            "subscriptions.csv",
            &format!("Channel Id,Channel Url,Channel Title\n{CHANNEL},url,Rick\n"),
        );
        let harness = Harness::new();

        let outcome = harness
            .transcoder()
            .import_subscriptions(ImportFormat::YouTubeCsv, &path)
            .await;

        assert_eq!(outcome, Outcome::Completed { count: 1 });
        assert_eq!(*harness.store.channel_ids.lock().unwrap(), vec![CHANNEL]);
        assert_eq!(
            harness.notices(),
            vec![Notice::Imported {
                kind: DataKind::Subscriptions,
                count: 1
            }]
        );
    }

    #[tokio::test]
    async fn test_unsupported_export_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("subscriptions.csv");
        let harness = Harness::new();

        let outcome = harness
            .transcoder()
            .export_subscriptions(ImportFormat::YouTubeCsv, &path)
            .await;

        assert!(matches!(outcome, Outcome::Failed { .. }));
        assert!(!path.exists());
        assert!(matches!(
            harness.notices().as_slice(),
            [Notice::Failed { message }] if message.contains("youtube-csv")
        ));
    }

    #[tokio::test]
    async fn test_unsupported_playlist_export_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("playlist.txt");
        let harness = Harness::new();

        let outcome = harness
            .transcoder()
            .export_playlists(ImportFormat::UrlsOrIds, &path)
            .await;

        assert!(matches!(outcome, Outcome::Failed { .. }));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_history_export_reports_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        let harness = Harness::new();

        let outcome = harness
            .transcoder()
            .export(DataKind::WatchHistory, ImportFormat::YouTubeJson, &path)
            .await;

        assert!(matches!(outcome, Outcome::Failed { .. }));
        assert!(!path.exists());
        assert_eq!(
            harness.notices(),
            vec![Notice::Failed {
                message: "youtube-json (application/json) does not support export of watch history"
                    .into()
            }]
        );
    }

    #[tokio::test]
    async fn test_missing_source_is_unavailable() {
        let dir = tempdir().unwrap();
        let harness = Harness::new();

        let outcome = harness
            .transcoder()
            .import_playlists(ImportFormat::Piped, &dir.path().join("missing.json"))
            .await;

        assert_eq!(outcome, Outcome::Unavailable);
        assert!(matches!(
            harness.notices().as_slice(),
            [Notice::SourceUnavailable { .. }]
        ));
    }

    #[tokio::test]
    async fn test_empty_result_is_not_an_error() {
        let dir = tempdir().unwrap();
        let path = write_fixture(dir.path(), "list.txt", "not an id\n\n");
        let harness = Harness::new();

        let outcome = harness
            .transcoder()
            .import_playlists(ImportFormat::UrlsOrIds, &path)
            .await;

        assert_eq!(outcome, Outcome::Empty);
        assert_eq!(
            harness.notices(),
            vec![Notice::NothingFound {
                kind: DataKind::Playlists
            }]
        );
    }

    #[tokio::test]
    async fn test_malformed_file_fails_with_message() {
        let dir = tempdir().unwrap();
        let path = write_fixture(dir.path(), "subs.json", "{ not json");
        let harness = Harness::new();

        let outcome = harness
            .transcoder()
            .import_subscriptions(ImportFormat::NewPipe, &path)
            .await;

        let Outcome::Failed { message } = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert!(message.starts_with("Could not decode file: Invalid NewPipe subscriptions file"));
        assert!(harness.store.channel_ids.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_piped_export_then_import_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("playlists.json");
        let exporter = Harness::new();
        let playlists = vec![
            Playlist::new("One", vec!["dQw4w9WgXcQ".into(), "9bZkp7q19f0".into()]),
            Playlist::new("Two", vec!["kJQP7kiw5Fk".into()]),
        ];
        exporter.store.playlists.lock().unwrap().extend(playlists.clone());

        let exported = exporter
            .transcoder()
            .export_playlists(ImportFormat::Piped, &path)
            .await;
        assert_eq!(exported, Outcome::Completed { count: 2 });

        let importer = Harness::new();
        let imported = importer
            .transcoder()
            .import_playlists(ImportFormat::Piped, &path)
            .await;

        assert_eq!(imported, Outcome::Completed { count: 2 });
        assert_eq!(*importer.store.playlists.lock().unwrap(), playlists);
    }

    #[tokio::test]
    async fn test_history_appended_oldest_first() {
        let dir = tempdir().unwrap();
        let record = |title: &str, id: &str| {
            format!(
                r#"{{"header":"YouTube","title":"Watched {title}","titleUrl":"https://www.youtube.com/watch?v={id}","subtitles":[{{"name":"Ch","url":"https://www.youtube.com/channel/{CHANNEL}"}}]}}"#
            )
        };
        let path = write_fixture(
            dir.path(),
            "watch-history.json",
            &format!("[{},{}]", record("New", "9bZkp7q19f0"), record("Old", "dQw4w9WgXcQ")),
        );
        let harness = Harness::new();

        let outcome = harness
            .transcoder()
            .import_watch_history(ImportFormat::YouTubeJson, &path)
            .await;

        assert_eq!(outcome, Outcome::Completed { count: 2 });
        let history = harness.store.history.lock().unwrap();
        assert_eq!(history[0].title, "Old");
        assert_eq!(history[1].title, "New");
    }

    #[test]
    fn test_export_file_name() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 0).unwrap();
        assert_eq!(
            export_file_name(DataKind::Playlists, ImportFormat::FreeTube, at),
            "playlists-20240301-101500.json"
        );
    }
}
