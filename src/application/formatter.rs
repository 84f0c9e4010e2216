//! Output formatting for the local library and the format catalogue.
//!
//! Supports table and JSON output.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::domain::{DataKind, Direction, ImportFormat, Playlist, Subscription, WatchHistoryEntry};

use super::dispatcher;

/// Output format options for listings.
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Compact table listing.
    #[default]
    Table,
    /// JSON format for programmatic use.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output: {s}. Use: table, json")),
        }
    }
}

/// Formats a table listing of subscriptions.
pub fn format_subscriptions_table(subscriptions: &[Subscription]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Channel ID", "Name"]);

    for sub in subscriptions {
        let name = if sub.name.is_empty() {
            "-".to_string()
        } else {
            truncate(&sub.name, 40)
        };
        table.add_row(vec![sub.channel_id.as_str(), name.as_str()]);
    }

    table.to_string()
}

/// Formats a table listing of playlists.
pub fn format_playlists_table(playlists: &[Playlist]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Name", "Videos", "First video"]);

    for playlist in playlists {
        let first = playlist.video_ids.first().map_or("-", String::as_str);
        table.add_row(vec![
            truncate(&playlist.name, 40),
            playlist.video_ids.len().to_string(),
            first.to_string(),
        ]);
    }

    table.to_string()
}

/// Formats a table listing of watch history entries.
pub fn format_history_table(entries: &[WatchHistoryEntry]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Video", "Watched", "Uploader", "Title"]);

    for entry in entries {
        let watched = entry.watched_at.map_or_else(
            || "-".to_string(),
            |dt| dt.format("%Y-%m-%d %H:%M").to_string(),
        );
        let uploader = entry
            .uploader
            .as_deref()
            .or_else(|| entry.uploader_channel_id())
            .map_or_else(|| "-".to_string(), |name| truncate(name, 20));

        table.add_row(vec![
            entry.video_id.clone(),
            watched,
            uploader,
            truncate(&entry.title, 40),
        ]);
    }

    table.to_string()
}

/// Formats the import/export support matrix.
pub fn format_support_table() -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    let mut header = vec!["Format".to_string(), "MIME type".to_string()];
    header.extend(DataKind::ALL.iter().map(ToString::to_string));
    table.set_header(header);

    for format in ImportFormat::ALL {
        let mut row = vec![format.name().to_string(), format.mime_type().to_string()];
        row.extend(DataKind::ALL.iter().map(|&kind| support_cell(kind, format)));
        table.add_row(row);
    }

    table.to_string()
}

fn support_cell(kind: DataKind, format: ImportFormat) -> String {
    let import = dispatcher::supports(kind, format, Direction::Import);
    let export = dispatcher::supports(kind, format, Direction::Export);
    match (import, export) {
        (true, true) => "import, export".to_string(),
        (true, false) => "import".to_string(),
        (false, true) => "export".to_string(),
        (false, false) => "-".to_string(),
    }
}

/// Formats library counts for display.
pub fn format_library_stats(subscriptions: usize, playlists: usize, history: usize) -> String {
    format!(
        "{}\n  Subscriptions: {}\n  Playlists: {}\n  Watch history: {}",
        "📊 Library".bold(),
        subscriptions.to_string().cyan(),
        playlists.to_string().green(),
        history.to_string().yellow()
    )
}

/// Truncates a string to max length with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    let s = s.lines().next().unwrap_or(s);
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world!", 8), "hello...");
        assert_eq!(truncate("ääääääääää", 5), "ää...");
    }

    #[test]
    fn test_output_format_from_str() {
        assert!(matches!("table".parse::<OutputFormat>(), Ok(OutputFormat::Table)));
        assert!(matches!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json)));
        assert!("markdown".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_support_cells() {
        assert_eq!(
            support_cell(DataKind::Subscriptions, ImportFormat::NewPipe),
            "import, export"
        );
        assert_eq!(support_cell(DataKind::Playlists, ImportFormat::UrlsOrIds), "import");
        assert_eq!(support_cell(DataKind::WatchHistory, ImportFormat::Piped), "-");
    }

    #[test]
    fn test_support_table_lists_every_format() {
        let table = format_support_table();
        for format in ImportFormat::ALL {
            assert!(table.contains(format.name()));
        }
    }

    #[test]
    fn test_playlists_table() {
        let table = format_playlists_table(&[Playlist::new("Road trip", vec!["dQw4w9WgXcQ".into()])]);
        assert!(table.contains("Road trip"));
        assert!(table.contains("dQw4w9WgXcQ"));
    }
}
