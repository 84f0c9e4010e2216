//! Subscription import and export.
//!
//! Imports yield channel IDs only; channel names cannot be recovered from
//! every format, so they are left to the subscription store.

use crate::domain::formats::NEWPIPE_YOUTUBE_SERVICE;
use crate::domain::{
    AppConfig, AppError, Decoded, FreeTubeProfile, FreeTubeSubscription, NewPipeSubscription,
    NewPipeSubscriptions, RemoteSubscription, Result, CHANNEL_ID_LEN,
};

use super::identifier::channel_id;
use super::tabular;

/// Prefix NewPipe and FreeTube write in front of channel IDs.
const CHANNEL_URL_PREFIX: &str = "https://www.youtube.com/channel/";

/// Decodes a NewPipe `subscriptions.json`.
///
/// # Errors
/// Returns error if the document is not valid NewPipe JSON.
pub fn decode_newpipe(text: &str, config: &AppConfig) -> Result<Decoded<String>> {
    let file: NewPipeSubscriptions = serde_json::from_str(text)
        .map_err(|e| AppError::decode("Invalid NewPipe subscriptions file", e))?;

    let total = file.subscriptions.len();
    let ids: Vec<String> = file
        .subscriptions
        .iter()
        .filter(|sub| sub.service_id == NEWPIPE_YOUTUBE_SERVICE)
        .filter_map(|sub| channel_from_url(&sub.url, config))
        .collect();

    let skipped = total - ids.len();
    Ok(Decoded::new(ids, skipped))
}

/// Decodes a FreeTube subscription profile.
///
/// # Errors
/// Returns error if the document is not a FreeTube profile.
pub fn decode_freetube(text: &str, config: &AppConfig) -> Result<Decoded<String>> {
    let profile: FreeTubeProfile = serde_json::from_str(text)
        .map_err(|e| AppError::decode("Invalid FreeTube subscriptions file", e))?;

    let total = profile.subscriptions.len();
    let ids: Vec<String> = profile
        .subscriptions
        .iter()
        .filter_map(|sub| {
            let source = if sub.url.is_empty() { &sub.id } else { &sub.url };
            channel_from_url(source, config)
        })
        .collect();

    let skipped = total - ids.len();
    Ok(Decoded::new(ids, skipped))
}

/// Decodes a Takeout `subscriptions.csv`. Rows whose first field is not a
/// channel ID, the header included, are dropped.
///
/// # Errors
/// Never fails; the signature matches the other decoders.
pub fn decode_youtube_csv(text: &str, _config: &AppConfig) -> Result<Decoded<String>> {
    let lines = tabular::lines(text);
    let total = lines.len();

    let ids: Vec<String> = lines
        .iter()
        .filter_map(|line| line.split(',').next().map(tabular::clean_field))
        .filter(|id| id.chars().count() == CHANNEL_ID_LEN)
        .map(str::to_string)
        .collect();

    let skipped = total - ids.len();
    Ok(Decoded::new(ids, skipped))
}

/// Encodes subscriptions as a NewPipe `subscriptions.json`.
///
/// # Errors
/// Returns error if serialization fails.
pub fn encode_newpipe(subscriptions: &[RemoteSubscription], config: &AppConfig) -> Result<String> {
    let file = NewPipeSubscriptions {
        app_version: String::new(),
        app_version_int: 0,
        subscriptions: subscriptions
            .iter()
            .map(|sub| NewPipeSubscription {
                service_id: NEWPIPE_YOUTUBE_SERVICE,
                url: config.frontend.absolute_url(&sub.url),
                name: sub.name.clone(),
            })
            .collect(),
    };

    serde_json::to_string_pretty(&file).map_err(AppError::json_parse)
}

/// Encodes subscriptions as a FreeTube subscription profile.
///
/// # Errors
/// Returns error if serialization fails.
pub fn encode_freetube(subscriptions: &[RemoteSubscription], config: &AppConfig) -> Result<String> {
    let origin = &config.frontend.origin;
    let profile = FreeTubeProfile {
        id: "allChannels".to_string(),
        name: "All Channels".to_string(),
        bg_color: "#000000".to_string(),
        text_color: "#FFFFFF".to_string(),
        subscriptions: subscriptions
            .iter()
            .map(|sub| FreeTubeSubscription {
                id: channel_id(&sub.url, origin).unwrap_or_default().to_string(),
                name: sub.name.clone(),
                url: config.frontend.absolute_url(&sub.url),
                thumbnail: String::new(),
            })
            .collect(),
    };

    serde_json::to_string_pretty(&profile).map_err(AppError::json_parse)
}

/// Removes the known channel URL prefix, then normalizes what is left.
fn channel_from_url(url: &str, config: &AppConfig) -> Option<String> {
    let stripped = url.replace(CHANNEL_URL_PREFIX, "");
    let id = channel_id(&stripped, &config.frontend.origin);
    if id.is_none() {
        tracing::debug!(url, "Skipping subscription without channel ID");
    }
    id.map(str::to_string)
}
