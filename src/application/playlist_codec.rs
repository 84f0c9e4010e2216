//! Playlist import and export.
//!
//! Four import encodings share nothing but the output type. Piped and
//! FreeTube also export; the Takeout CSV and URL list are import-only.

use crate::domain::{
    AppConfig, AppError, Decoded, FreeTubePlaylist, PipedPlaylist, PipedPlaylistFile, Playlist,
    Result,
};

use super::identifier::video_id;
use super::tabular;

/// A whole-document parse attempt for FreeTube playlist files.
type ParseStrategy = fn(&str) -> serde_json::Result<Vec<FreeTubePlaylist>>;

/// FreeTube writes one playlist per line in some versions and a single object
/// in others. Tried in this order; the first success wins.
const FREETUBE_STRATEGIES: [(&str, ParseStrategy); 2] = [
    ("line-delimited", parse_json_lines),
    ("single document", parse_single_document),
];

/// Decodes a Piped playlist export, reducing each video URL to its ID.
///
/// # Errors
/// Returns error if the document is not a Piped playlist file.
pub fn decode_piped(text: &str, config: &AppConfig) -> Result<Decoded<Playlist>> {
    let file: PipedPlaylistFile = serde_json::from_str(text)
        .map_err(|e| AppError::decode("Invalid Piped playlist file", e))?;

    let origin = &config.frontend.origin;
    let mut skipped = 0;
    let playlists = file
        .playlists
        .into_iter()
        .map(|playlist| {
            let total = playlist.videos.len();
            let video_ids: Vec<String> = playlist
                .videos
                .iter()
                .filter_map(|url| video_id(url, origin))
                .map(str::to_string)
                .collect();
            skipped += total - video_ids.len();
            Playlist::new(playlist.name, video_ids)
        })
        .collect();

    Ok(Decoded::new(playlists, skipped))
}

/// Decodes FreeTube playlists, trying each parse strategy in turn.
///
/// # Errors
/// Returns error if no strategy can parse the input.
pub fn decode_freetube(text: &str, config: &AppConfig) -> Result<Decoded<Playlist>> {
    let mut last_error = None;

    for (name, strategy) in FREETUBE_STRATEGIES {
        match strategy(text) {
            Ok(records) => {
                tracing::debug!(strategy = name, playlists = records.len(), "Parsed FreeTube playlists");
                return Ok(freetube_to_playlists(records, config));
            }
            Err(e) => {
                tracing::debug!(strategy = name, error = %e, "FreeTube parse strategy failed");
                last_error = Some(e);
            }
        }
    }

    Err(match last_error {
        Some(e) => AppError::decode("Invalid FreeTube playlist file", e),
        None => AppError::Decode {
            message: "Invalid FreeTube playlist file".into(),
            source: None,
        },
    })
}

/// One JSON object per non-blank line. Fails if any line fails.
fn parse_json_lines(text: &str) -> serde_json::Result<Vec<FreeTubePlaylist>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(serde_json::from_str)
        .collect()
}

/// The whole input as one playlist object.
fn parse_single_document(text: &str) -> serde_json::Result<Vec<FreeTubePlaylist>> {
    serde_json::from_str(text).map(|playlist| vec![playlist])
}

fn freetube_to_playlists(records: Vec<FreeTubePlaylist>, config: &AppConfig) -> Decoded<Playlist> {
    let origin = &config.frontend.origin;
    let mut skipped = 0;
    let playlists = records
        .into_iter()
        .map(|record| {
            let total = record.videos.len();
            let video_ids: Vec<String> = record
                .videos
                .iter()
                .filter_map(|video| video_id(&video.video_id, origin))
                .map(str::to_string)
                .collect();
            skipped += total - video_ids.len();

            let name = if record.playlist_name.is_empty() {
                config.playlists.placeholder_name.clone()
            } else {
                record.playlist_name
            };
            Playlist::new(name, video_ids)
        })
        .collect();

    Decoded::new(playlists, skipped)
}

/// Decodes a Takeout playlist CSV.
///
/// Line 1 holds the playlist metadata with the title third from the end.
/// Files with fewer than two lines, or whose metadata block never ends in a
/// blank line, decode to nothing.
///
/// # Errors
/// Never fails; the signature matches the other decoders.
pub fn decode_youtube_csv(text: &str, config: &AppConfig) -> Result<Decoded<Playlist>> {
    let lines = tabular::lines(text);
    if lines.len() < 2 {
        return Ok(Decoded::default());
    }

    let title = tabular::trailing_field(lines[1], 2);
    let Some(start) = tabular::data_start(&lines, title.is_some()) else {
        tracing::debug!("No blank line after playlist metadata, nothing to import");
        return Ok(Decoded::default());
    };

    let name = title
        .filter(|t| !t.is_empty())
        .map_or_else(|| config.playlists.placeholder_name.clone(), str::to_string);

    let mut skipped = 0;
    let video_ids: Vec<String> = lines
        .iter()
        .skip(start)
        .filter_map(|line| tabular::leading_field(line))
        .filter_map(|token| {
            let id = video_id(token, &config.frontend.origin);
            if id.is_none() {
                skipped += 1;
            }
            id
        })
        .map(str::to_string)
        .collect();

    Ok(Decoded::new(vec![Playlist::new(name, video_ids)], skipped))
}

/// Decodes a plain list of video URLs or IDs, comma or newline separated,
/// into one playlist under the placeholder name.
///
/// # Errors
/// Never fails; the signature matches the other decoders.
pub fn decode_urls(text: &str, config: &AppConfig) -> Result<Decoded<Playlist>> {
    let mut skipped = 0;
    let video_ids: Vec<String> = tabular::lines(text)
        .into_iter()
        .flat_map(|line| line.split(','))
        .map(tabular::clean_field)
        .filter(|token| !token.is_empty())
        .filter_map(|token| {
            let id = video_id(token, &config.frontend.origin);
            if id.is_none() {
                skipped += 1;
            }
            id
        })
        .map(str::to_string)
        .collect();

    if video_ids.is_empty() {
        return Ok(Decoded::new(Vec::new(), skipped));
    }

    let playlist = Playlist::new(config.playlists.placeholder_name.clone(), video_ids);
    Ok(Decoded::new(vec![playlist], skipped))
}

/// Encodes playlists as a Piped export document.
///
/// # Errors
/// Returns error if serialization fails.
pub fn encode_piped(playlists: &[PipedPlaylist]) -> Result<String> {
    let file = PipedPlaylistFile::new(playlists.to_vec());
    serde_json::to_string_pretty(&file).map_err(AppError::json_parse)
}

/// Encodes playlists as FreeTube line-delimited JSON.
///
/// # Errors
/// Returns error if serialization fails.
pub fn encode_freetube(playlists: &[FreeTubePlaylist]) -> Result<String> {
    let mut out = String::new();
    for playlist in playlists {
        out.push_str(&serde_json::to_string(playlist).map_err(AppError::json_parse)?);
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FrontendConfig;

    fn config() -> AppConfig {
        AppConfig::default()
    }

    #[test]
    fn test_piped_round_trip() {
        let playlists = vec![
            Playlist::new(
                "Music",
                vec!["dQw4w9WgXcQ".into(), "9bZkp7q19f0".into(), "dQw4w9WgXcQ".into()],
            ),
            Playlist::new("Empty", Vec::new()),
        ];
        let frontend = FrontendConfig::default();
        let native: Vec<PipedPlaylist> = playlists
            .iter()
            .map(|p| PipedPlaylist::from_playlist(p, &frontend))
            .collect();

        let text = encode_piped(&native).unwrap();
        let decoded = decode_piped(&text, &config()).unwrap();

        assert_eq!(decoded.records, playlists);
        assert_eq!(decoded.skipped, 0);
    }

    #[test]
    fn test_piped_skips_unrecognized_urls() {
        let text = r#"{"format":"Piped","version":1,"playlists":[{"name":"A","type":"playlist","visibility":"private",
            "videos":["https://www.youtube.com/watch?v=dQw4w9WgXcQ","https://www.youtube.com/watch?v=9bZkp7q19f0&t=3"]}]}"#;
        let decoded = decode_piped(text, &config()).unwrap();
        assert_eq!(decoded.records[0].video_ids, vec!["dQw4w9WgXcQ"]);
        assert_eq!(decoded.skipped, 1);
    }

    #[test]
    fn test_freetube_line_delimited() {
        let text = concat!(
            r#"{"playlistName":"Favorites","protected":true,"videos":[{"videoId":"dQw4w9WgXcQ"}],"_id":"favorites"}"#,
            "\n",
            r#"{"playlistName":"Later","videos":[{"videoId":"9bZkp7q19f0"},{"videoId":"kJQP7kiw5Fk"}],"_id":"ft-1"}"#,
            "\n\n"
        );
        let decoded = decode_freetube(text, &config()).unwrap();
        assert_eq!(decoded.records.len(), 2);
        assert_eq!(decoded.records[0].name, "Favorites");
        assert_eq!(decoded.records[1].video_ids, vec!["9bZkp7q19f0", "kJQP7kiw5Fk"]);
    }

    #[test]
    fn test_freetube_video_without_id_is_skipped() {
        let text = concat!(
            r#"{"playlistName":"Favorites","videos":[{"videoId":"dQw4w9WgXcQ"}]}"#,
            "\n",
            r#"{"playlistName":"Later","videos":[{"videoId":"9bZkp7q19f0"},{"title":"deleted video"}]}"#,
            "\n"
        );
        let decoded = decode_freetube(text, &config()).unwrap();
        assert_eq!(decoded.records.len(), 2);
        assert_eq!(decoded.records[1].video_ids, vec!["9bZkp7q19f0"]);
        assert_eq!(decoded.skipped, 1);
    }

    #[test]
    fn test_freetube_falls_back_to_single_document() {
        let text = r#"{
            "playlistName": "Pretty printed",
            "videos": [{"videoId": "dQw4w9WgXcQ", "title": "Song"}]
        }"#;
        let decoded = decode_freetube(text, &config()).unwrap();
        assert_eq!(
            decoded.records,
            vec![Playlist::new("Pretty printed", vec!["dQw4w9WgXcQ".into()])]
        );
    }

    #[test]
    fn test_freetube_unparsable() {
        let err = decode_freetube("not json at all", &config()).unwrap_err();
        assert!(matches!(err, AppError::Decode { .. }));
    }

    #[test]
    fn test_freetube_export_reimports() {
        let playlist = Playlist::new("Fav", vec!["dQw4w9WgXcQ".into()]);
        let records = vec![
            FreeTubePlaylist::from_playlist(&playlist, "1", 1_700_000_000_000),
            FreeTubePlaylist::from_playlist(&playlist, "2", 1_700_000_000_000),
        ];
        let text = encode_freetube(&records).unwrap();
        assert_eq!(text.lines().count(), 2);
        let decoded = decode_freetube(&text, &config()).unwrap();
        assert_eq!(decoded.records, vec![playlist.clone(), playlist]);
    }

    #[test]
    fn test_csv_too_short() {
        let decoded = decode_youtube_csv("Playlist Id,Channel Id", &config()).unwrap();
        assert!(decoded.is_empty());
        assert!(decode_youtube_csv("", &config()).unwrap().is_empty());
    }

    #[test]
    fn test_csv_named_playlist() {
        let text = "Playlist Id,Channel Id,Time Created,Time Updated,Title,Description,Visibility\n\
                    PLabc,UCuAXFkgsw1L7xaCfnd5JJOw,2021-01-01,2021-02-01,\"My Playlist\",,Public\n\
                    \n\
                    \n\
                    Video Id,Time Added\n\
                    dQw4w9WgXcQ,2021-01-01 00:00:00 UTC\n\
                    \n\
                    https://www.youtube.com/watch?v=9bZkp7q19f0,2021-01-02 00:00:00 UTC\n";
        let decoded = decode_youtube_csv(text, &config()).unwrap();
        assert_eq!(
            decoded.records,
            vec![Playlist::new(
                "My Playlist",
                vec!["dQw4w9WgXcQ".into(), "9bZkp7q19f0".into()]
            )]
        );
    }

    #[test]
    fn test_csv_three_field_metadata_takes_third_from_last() {
        let text = "Playlist Id,Channel Id,Title\n\
                    \"x\",\"y\",\"My Playlist\"\n\
                    \n\
                    Video Id,Time Added\n\
                    dQw4w9WgXcQ,2021-01-01 00:00:00 UTC\n";
        let decoded = decode_youtube_csv(text, &config()).unwrap();
        assert_eq!(
            decoded.records,
            vec![Playlist::new("x", vec!["dQw4w9WgXcQ".into()])]
        );
    }

    #[test]
    fn test_csv_without_title_uses_placeholder() {
        let text = "Watch later export\nVideo Id,Time Added\ndQw4w9WgXcQ,2021\n9bZkp7q19f0,2021\n";
        let decoded = decode_youtube_csv(text, &config()).unwrap();
        assert_eq!(decoded.records[0].name, "Imported playlist");
        assert_eq!(decoded.records[0].video_ids, vec!["dQw4w9WgXcQ", "9bZkp7q19f0"]);
    }

    #[test]
    fn test_csv_without_blank_line_yields_nothing() {
        let text = "Playlist Id,Channel Id,Time Created,Time Updated,Title,Description,Visibility\n\
                    PLabc,UCx,2021,2021,Mine,,Public\n\
                    dQw4w9WgXcQ,2021\n";
        assert!(decode_youtube_csv(text, &config()).unwrap().is_empty());
    }

    #[test]
    fn test_urls_mixed_tokens() {
        let text = "dQw4w9WgXcQ, https://youtu.be/9bZkp7q19f0\nhttps://www.youtube.com/watch?v=kJQP7kiw5Fk\nnope\n";
        let decoded = decode_urls(text, &config()).unwrap();
        assert_eq!(decoded.records.len(), 1);
        assert_eq!(decoded.records[0].name, "Imported playlist");
        assert_eq!(
            decoded.records[0].video_ids,
            vec!["dQw4w9WgXcQ", "9bZkp7q19f0", "kJQP7kiw5Fk"]
        );
        assert_eq!(decoded.skipped, 1);
    }

    #[test]
    fn test_urls_nothing_usable() {
        let decoded = decode_urls("\n\nfoo,bar\n", &config()).unwrap();
        assert!(decoded.is_empty());
    }
}
