//! Application configuration.
//!
//! Front-end origin, thumbnail template, playlist placeholder name and
//! data paths. Every field has a default so partial files load.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Front-end and thumbnail settings used when building or stripping URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontendConfig {
    /// Origin stripped from imported URLs and prefixed to exported ones.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Host serving video thumbnails.
    #[serde(default = "default_thumbnail_host")]
    pub thumbnail_host: String,

    /// Thumbnail quality tag, e.g. `hqdefault`.
    #[serde(default = "default_thumbnail_quality")]
    pub thumbnail_quality: String,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            thumbnail_host: default_thumbnail_host(),
            thumbnail_quality: default_thumbnail_quality(),
        }
    }
}

impl FrontendConfig {
    /// Thumbnail URL for a video ID.
    #[must_use]
    pub fn thumbnail_url(&self, video_id: &str) -> String {
        format!(
            "{}/vi/{video_id}/{}.jpg",
            self.thumbnail_host.trim_end_matches('/'),
            self.thumbnail_quality
        )
    }

    /// Absolute URL for a path relative to the origin.
    #[must_use]
    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}{path}", self.origin.trim_end_matches('/'))
    }

    /// Watch page URL for a video ID.
    #[must_use]
    pub fn watch_url(&self, video_id: &str) -> String {
        self.absolute_url(&format!("/watch?v={video_id}"))
    }
}

fn default_origin() -> String {
    "https://www.youtube.com".to_string()
}

fn default_thumbnail_host() -> String {
    "https://i.ytimg.com".to_string()
}

fn default_thumbnail_quality() -> String {
    "hqdefault".to_string()
}

/// Playlist import settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistConfig {
    /// Name given to playlists whose source carries none.
    #[serde(default = "default_placeholder_name")]
    pub placeholder_name: String,
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            placeholder_name: default_placeholder_name(),
        }
    }
}

fn default_placeholder_name() -> String {
    "Imported playlist".to_string()
}

/// Account settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AccountConfig {
    /// Token passed to the subscription store when fetching.
    #[serde(default)]
    pub auth_token: Option<String>,
}

/// Path configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Base data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub frontend: FrontendConfig,

    #[serde(default)]
    pub playlists: PlaylistConfig,

    #[serde(default)]
    pub account: AccountConfig,

    #[serde(default)]
    pub paths: PathConfig,
}

impl AppConfig {
    /// Get the data directory, using default if not configured.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.paths
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".yt-transcode")
    }

    /// Get the library database path.
    #[must_use]
    pub fn library_db_path(&self) -> PathBuf {
        self.data_dir().join("library.db")
    }

    /// Get the config file path. Always under the default data directory,
    /// since `[paths] data_dir` is itself read from this file.
    #[must_use]
    pub fn config_file_path() -> PathBuf {
        Self::default_data_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.frontend.origin, "https://www.youtube.com");
        assert_eq!(config.playlists.placeholder_name, "Imported playlist");
        assert!(config.account.auth_token.is_none());
    }

    #[test]
    fn test_thumbnail_url() {
        let frontend = FrontendConfig::default();
        assert_eq!(
            frontend.thumbnail_url("dQw4w9WgXcQ"),
            "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg"
        );
    }

    #[test]
    fn test_absolute_url_trims_trailing_slash() {
        let frontend = FrontendConfig {
            origin: "https://piped.example/".into(),
            ..FrontendConfig::default()
        };
        assert_eq!(
            frontend.absolute_url("/channel/UCuAXFkgsw1L7xaCfnd5JJOw"),
            "https://piped.example/channel/UCuAXFkgsw1L7xaCfnd5JJOw"
        );
        assert_eq!(
            frontend.watch_url("dQw4w9WgXcQ"),
            "https://piped.example/watch?v=dQw4w9WgXcQ"
        );
    }
}
