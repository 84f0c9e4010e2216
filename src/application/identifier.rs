//! Video and channel ID recovery from URLs or raw IDs.
//!
//! IDs are taken from the tail of the string: the identifier is expected to be
//! the last path token. Query strings and path prefixes are not parsed, so a
//! URL that carries the ID anywhere else yields `None`.

use crate::domain::{CHANNEL_ID_LEN, VIDEO_ID_LEN};

/// Recovers a normalized 11-character video ID.
#[must_use]
pub fn video_id<'a>(value: &'a str, origin: &str) -> Option<&'a str> {
    trailing_id(value, origin, VIDEO_ID_LEN)
}

/// Recovers a normalized 24-character channel ID.
#[must_use]
pub fn channel_id<'a>(value: &'a str, origin: &str) -> Option<&'a str> {
    trailing_id(value, origin, CHANNEL_ID_LEN)
}

/// Returns `value` unchanged when it already has the target length, otherwise
/// strips `origin` and takes the last `len` characters.
fn trailing_id<'a>(value: &'a str, origin: &str, len: usize) -> Option<&'a str> {
    let value = value.trim();
    if value.chars().count() == len {
        return Some(value);
    }

    let origin = origin.trim_end_matches('/');
    let rest = if origin.is_empty() {
        value
    } else {
        value.strip_prefix(origin).unwrap_or(value)
    };

    let start = rest.len().checked_sub(len)?;
    let tail = rest.get(start..)?;

    tail.chars().all(is_id_char).then_some(tail)
}

/// Characters that can appear in a video or channel ID.
const fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://www.youtube.com";
    const CHANNEL: &str = "UCuAXFkgsw1L7xaCfnd5JJOw";
    const VIDEO: &str = "dQw4w9WgXcQ";

    #[test]
    fn test_channel_url() {
        let url = format!("{ORIGIN}/channel/{CHANNEL}");
        assert_eq!(channel_id(&url, ORIGIN), Some(CHANNEL));
    }

    #[test]
    fn test_bare_ids_returned_unchanged() {
        assert_eq!(channel_id(CHANNEL, ORIGIN), Some(CHANNEL));
        assert_eq!(video_id(VIDEO, ORIGIN), Some(VIDEO));
    }

    #[test]
    fn test_watch_url() {
        let url = format!("{ORIGIN}/watch?v={VIDEO}");
        assert_eq!(video_id(&url, ORIGIN), Some(VIDEO));
    }

    #[test]
    fn test_short_link_from_other_origin() {
        assert_eq!(video_id("https://youtu.be/dQw4w9WgXcQ", ORIGIN), Some(VIDEO));
    }

    #[test]
    fn test_id_not_at_tail_fails() {
        let url = format!("{ORIGIN}/watch?v={VIDEO}&t=42");
        assert_eq!(video_id(&url, ORIGIN), None);
    }

    #[test]
    fn test_origin_is_not_consumed() {
        assert_eq!(video_id(&format!("{ORIGIN}/abc"), ORIGIN), None);
        assert_eq!(channel_id("", ORIGIN), None);
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        assert_eq!(video_id(" dQw4w9WgXcQ\r", ORIGIN), Some(VIDEO));
    }
}
