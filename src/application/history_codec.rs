//! Watch history import from a Google Takeout `watch-history.json`.

use chrono::{DateTime, Utc};

use crate::domain::{
    channel_path, AppConfig, AppError, Decoded, Result, TakeoutActivity, WatchHistoryEntry,
};

use super::identifier::{channel_id, video_id};

/// Header of activity records that are YouTube video views.
const WATCH_ACTIVITY_HEADER: &str = "YouTube";

/// Prefix Takeout puts in front of every watched title.
const WATCHED_PREFIX: &str = "Watched ";

/// Decodes watch history, oldest first.
///
/// Takeout lists the most recent view first; the result is reversed so it can
/// be appended to the history store in chronological order.
///
/// # Errors
/// Returns error if the document is not a list of activity records.
pub fn decode_youtube_json(text: &str, config: &AppConfig) -> Result<Decoded<WatchHistoryEntry>> {
    let activities: Vec<TakeoutActivity> = serde_json::from_str(text)
        .map_err(|e| AppError::decode("Invalid watch history file", e))?;

    let total = activities.len();
    let mut entries: Vec<WatchHistoryEntry> = activities
        .iter()
        .filter(|activity| is_video_view(activity))
        .filter_map(|activity| to_entry(activity, config))
        .collect();
    entries.reverse();

    let skipped = total - entries.len();
    tracing::debug!(entries = entries.len(), skipped, "Decoded watch history");

    Ok(Decoded::new(entries, skipped))
}

/// Activity is a video view with an uploader and a link.
fn is_video_view(activity: &TakeoutActivity) -> bool {
    activity.header == WATCH_ACTIVITY_HEADER
        && !activity.subtitles.is_empty()
        && !activity.title_url.is_empty()
}

fn to_entry(activity: &TakeoutActivity, config: &AppConfig) -> Option<WatchHistoryEntry> {
    let origin = &config.frontend.origin;
    let video_id = video_id(&activity.title_url, origin)?;
    let uploader = activity.subtitles.first()?;

    let title = activity
        .title
        .strip_prefix(WATCHED_PREFIX)
        .unwrap_or(&activity.title);

    let uploader_url = uploader
        .url
        .as_deref()
        .and_then(|url| channel_id(url, origin))
        .map(channel_path);

    let watched_at = activity
        .time
        .as_deref()
        .and_then(|time| time.parse::<DateTime<Utc>>().ok());

    Some(WatchHistoryEntry {
        video_id: video_id.to_string(),
        title: title.to_string(),
        uploader: Some(uploader.name.clone()),
        uploader_url,
        thumbnail_url: config.frontend.thumbnail_url(video_id),
        watched_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHANNEL: &str = "UCuAXFkgsw1L7xaCfnd5JJOw";

    fn record(title: &str, video: &str, time: &str) -> String {
        format!(
            r#"{{"header":"YouTube","title":"Watched {title}","titleUrl":"https://www.youtube.com/watch?v={video}",
               "subtitles":[{{"name":"Ch","url":"https://www.youtube.com/channel/{CHANNEL}"}}],
               "time":"{time}","products":["YouTube"],"activityControls":["YouTube watch history"]}}"#
        )
    }

    #[test]
    fn test_single_record() {
        let text = format!("[{}]", record("My Video", "dQw4w9WgXcQ", "2024-03-01T10:00:00.000Z"));
        let decoded = decode_youtube_json(&text, &AppConfig::default()).unwrap();

        assert_eq!(decoded.records.len(), 1);
        let entry = &decoded.records[0];
        assert_eq!(entry.video_id, "dQw4w9WgXcQ");
        assert_eq!(entry.title, "My Video");
        assert_eq!(entry.uploader.as_deref(), Some("Ch"));
        assert_eq!(entry.uploader_channel_id(), Some(CHANNEL));
        assert_eq!(
            entry.thumbnail_url,
            "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg"
        );
        assert!(entry.watched_at.is_some());
    }

    #[test]
    fn test_output_is_chronological() {
        let text = format!(
            "[{},{}]",
            record("Newest", "9bZkp7q19f0", "2024-03-02T10:00:00Z"),
            record("Oldest", "dQw4w9WgXcQ", "2024-03-01T10:00:00Z")
        );
        let decoded = decode_youtube_json(&text, &AppConfig::default()).unwrap();
        let titles: Vec<&str> = decoded.records.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Oldest", "Newest"]);
    }

    #[test]
    fn test_partial_matches_discarded() {
        let text = format!(
            r#"[
                {{"header":"YouTube Music","title":"Watched Song","titleUrl":"https://music.youtube.com/watch?v=dQw4w9WgXcQ",
                  "subtitles":[{{"name":"Ch"}}]}},
                {{"header":"YouTube","title":"Watched a video that has been removed"}},
                {{"header":"YouTube","title":"Watched Unlisted","titleUrl":"https://www.youtube.com/watch?v=9bZkp7q19f0","subtitles":[]}},
                {}
            ]"#,
            record("Kept", "kJQP7kiw5Fk", "not a date")
        );
        let decoded = decode_youtube_json(&text, &AppConfig::default()).unwrap();
        assert_eq!(decoded.records.len(), 1);
        assert_eq!(decoded.records[0].title, "Kept");
        assert_eq!(decoded.records[0].watched_at, None);
        assert_eq!(decoded.skipped, 3);
    }

    #[test]
    fn test_uploader_without_url_is_kept() {
        let text = r#"[{"header":"YouTube","title":"Watched Topic track",
            "titleUrl":"https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "subtitles":[{"name":"Ch"}]}]"#;
        let decoded = decode_youtube_json(text, &AppConfig::default()).unwrap();

        assert_eq!(decoded.records.len(), 1);
        assert_eq!(decoded.skipped, 0);
        let entry = &decoded.records[0];
        assert_eq!(entry.title, "Topic track");
        assert_eq!(entry.uploader.as_deref(), Some("Ch"));
        assert_eq!(entry.uploader_url, None);
    }

    #[test]
    fn test_wrong_shape_is_error() {
        let err = decode_youtube_json(r#"{"header":"YouTube"}"#, &AppConfig::default()).unwrap_err();
        assert!(matches!(err, AppError::Decode { .. }));
    }
}
