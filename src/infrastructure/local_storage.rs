//! Local SQLite library for subscriptions, playlists and watch history.
//!
//! Implements all three store ports on one database so imports made with
//! one format can be exported with another.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::domain::{
    AppError, FreeTubePlaylist, FrontendConfig, HistoryStore, PipedPlaylist,
    Playlist, PlaylistStore, RemoteSubscription, Result, Subscription, SubscriptionStore,
    WatchHistoryEntry,
};

/// Local storage repository using SQLite.
pub struct LocalStorage {
    conn: Mutex<Connection>,
    frontend: FrontendConfig,
}

impl LocalStorage {
    /// Opens or creates the library database.
    ///
    /// # Errors
    /// Returns error if database cannot be opened or schema creation fails.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AppError::io("Failed to create storage directory", e))?;
        }

        let conn = Connection::open(path).map_err(AppError::database)?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;",
        )
        .map_err(AppError::database)?;

        tracing::debug!(path = %path.display(), "Opened library database");
        Self::with_connection(conn)
    }

    /// Opens a throwaway in-memory library.
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(AppError::database)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(AppError::database)?;
        Self::with_connection(conn)
    }

    /// Use `frontend` when building watch URLs for native playlist exports.
    #[must_use]
    pub fn with_frontend(mut self, frontend: FrontendConfig) -> Self {
        self.frontend = frontend;
        self
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let storage = Self {
            conn: Mutex::new(conn),
            frontend: FrontendConfig::default(),
        };
        storage.init_schema()?;
        Ok(storage)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| AppError::Database {
            message: "Library connection lock poisoned".into(),
            source: None,
        })
    }

    /// Initialize database schema.
    fn init_schema(&self) -> Result<()> {
        self.conn()?
            .execute_batch(
                r"
            CREATE TABLE IF NOT EXISTS subscriptions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                channel_id TEXT UNIQUE NOT NULL,
                name TEXT NOT NULL DEFAULT '',
                subscribed_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS playlists (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                created_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS playlist_videos (
                playlist_id INTEGER NOT NULL REFERENCES playlists(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                video_id TEXT NOT NULL,
                PRIMARY KEY (playlist_id, position)
            );

            CREATE TABLE IF NOT EXISTS watch_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                video_id TEXT NOT NULL,
                title TEXT NOT NULL,
                uploader TEXT,
                uploader_url TEXT,
                thumbnail_url TEXT NOT NULL,
                watched_at TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_watch_history_video
                ON watch_history(video_id);
            ",
            )
            .map_err(AppError::database)?;

        Ok(())
    }

    /// Subscribe to channels, ignoring ones already present.
    pub fn insert_channels(&self, channel_ids: &[String]) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(AppError::database)?;

        let mut inserted = 0;
        {
            let mut stmt = tx
                .prepare("INSERT OR IGNORE INTO subscriptions (channel_id) VALUES (?1)")
                .map_err(AppError::database)?;
            for channel_id in channel_ids {
                inserted += stmt.execute([channel_id]).map_err(AppError::database)?;
            }
        }

        tx.commit().map_err(AppError::database)?;
        tracing::debug!(submitted = channel_ids.len(), inserted, "Stored subscriptions");
        Ok(inserted)
    }

    /// All subscriptions in subscription order.
    pub fn get_subscriptions(&self) -> Result<Vec<Subscription>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT channel_id, name FROM subscriptions ORDER BY id")
            .map_err(AppError::database)?;

        let rows = stmt
            .query_map([], |row| {
                Ok(Subscription {
                    channel_id: row.get(0)?,
                    name: row.get(1)?,
                })
            })
            .map_err(AppError::database)?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(AppError::database)
    }

    /// Store playlists in one transaction.
    pub fn insert_playlists(&self, playlists: &[Playlist]) -> Result<()> {
        let created_at = Utc::now().timestamp_millis();
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(AppError::database)?;

        for playlist in playlists {
            tx.execute(
                "INSERT INTO playlists (name, created_at) VALUES (?1, ?2)",
                params![&playlist.name, created_at],
            )
            .map_err(AppError::database)?;
            let playlist_id = tx.last_insert_rowid();

            let mut stmt = tx
                .prepare(
                    "INSERT INTO playlist_videos (playlist_id, position, video_id) VALUES (?1, ?2, ?3)",
                )
                .map_err(AppError::database)?;
            for (position, video_id) in playlist.video_ids.iter().enumerate() {
                stmt.execute(params![playlist_id, position as i64, video_id])
                    .map_err(AppError::database)?;
            }
        }

        tx.commit().map_err(AppError::database)?;
        tracing::debug!(count = playlists.len(), "Stored playlists");
        Ok(())
    }

    /// All playlists with their row ID and creation time in milliseconds.
    fn stored_playlists(&self) -> Result<Vec<(i64, i64, Playlist)>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT id, name, created_at FROM playlists ORDER BY id")
            .map_err(AppError::database)?;
        let headers = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })
            .map_err(AppError::database)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(AppError::database)?;

        let mut videos = conn
            .prepare("SELECT video_id FROM playlist_videos WHERE playlist_id = ?1 ORDER BY position")
            .map_err(AppError::database)?;

        let mut playlists = Vec::with_capacity(headers.len());
        for (id, name, created_at) in headers {
            let video_ids = videos
                .query_map([id], |row| row.get::<_, String>(0))
                .map_err(AppError::database)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(AppError::database)?;
            playlists.push((id, created_at, Playlist::new(name, video_ids)));
        }

        Ok(playlists)
    }

    /// All playlists in stored order.
    pub fn get_playlists(&self) -> Result<Vec<Playlist>> {
        Ok(self
            .stored_playlists()?
            .into_iter()
            .map(|(_, _, playlist)| playlist)
            .collect())
    }

    /// Append one watch history entry.
    pub fn insert_history_entry(&self, entry: &WatchHistoryEntry) -> Result<()> {
        self.conn()?
            .execute(
                r"
            INSERT INTO watch_history
                (video_id, title, uploader, uploader_url, thumbnail_url, watched_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
                params![
                    &entry.video_id,
                    &entry.title,
                    &entry.uploader,
                    &entry.uploader_url,
                    &entry.thumbnail_url,
                    entry.watched_at.map(|dt| dt.to_rfc3339()),
                ],
            )
            .map_err(AppError::database)?;

        Ok(())
    }

    /// Watch history, most recently appended first.
    pub fn get_history(&self, limit: Option<usize>) -> Result<Vec<WatchHistoryEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                r"
            SELECT video_id, title, uploader, uploader_url, thumbnail_url, watched_at
            FROM watch_history
            ORDER BY id DESC
            LIMIT ?1
            ",
            )
            .map_err(AppError::database)?;

        let limit = limit.map_or(-1, |n| i64::try_from(n).unwrap_or(i64::MAX));
        let rows = stmt
            .query_map([limit], |row| {
                let watched_at: Option<String> = row.get(5)?;
                Ok(WatchHistoryEntry {
                    video_id: row.get(0)?,
                    title: row.get(1)?,
                    uploader: row.get(2)?,
                    uploader_url: row.get(3)?,
                    thumbnail_url: row.get(4)?,
                    watched_at: watched_at
                        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                        .map(|dt| dt.with_timezone(&Utc)),
                })
            })
            .map_err(AppError::database)?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(AppError::database)
    }

    /// Row counts for subscriptions, playlists and history.
    pub fn counts(&self) -> Result<(usize, usize, usize)> {
        let conn = self.conn()?;
        let count = |table: &str| -> Result<usize> {
            conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get::<_, i64>(0)
            })
            .map(|c| usize::try_from(c).unwrap_or(0))
            .map_err(AppError::database)
        };

        Ok((
            count("subscriptions")?,
            count("playlists")?,
            count("watch_history")?,
        ))
    }
}

#[async_trait]
impl SubscriptionStore for LocalStorage {
    async fn submit(&self, channel_ids: &[String]) -> Result<()> {
        self.insert_channels(channel_ids).map(|_| ())
    }

    async fn fetch_all(&self, auth_token: Option<&str>) -> Result<Vec<RemoteSubscription>> {
        if auth_token.is_some() {
            tracing::debug!("Local library ignores the account token");
        }

        Ok(self
            .get_subscriptions()?
            .iter()
            .map(RemoteSubscription::from)
            .collect())
    }
}

#[async_trait]
impl PlaylistStore for LocalStorage {
    async fn submit(&self, playlists: &[Playlist]) -> Result<()> {
        self.insert_playlists(playlists)
    }

    async fn fetch_all_native(&self) -> Result<Vec<PipedPlaylist>> {
        Ok(self
            .get_playlists()?
            .iter()
            .map(|playlist| PipedPlaylist::from_playlist(playlist, &self.frontend))
            .collect())
    }

    async fn fetch_all_alt_format(&self) -> Result<Vec<FreeTubePlaylist>> {
        Ok(self
            .stored_playlists()?
            .iter()
            .map(|(id, created_at, playlist)| {
                FreeTubePlaylist::from_playlist(playlist, format!("library-{id}"), *created_at)
            })
            .collect())
    }
}

#[async_trait]
impl HistoryStore for LocalStorage {
    async fn append(&self, entry: &WatchHistoryEntry) -> Result<()> {
        self.insert_history_entry(entry)
    }
}
