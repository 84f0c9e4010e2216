//! Application layer - use cases and orchestration.
//!
//! This layer contains the codecs, the codec table and the transcoding
//! facade that ties them to streams and stores.

pub mod dispatcher;
pub mod formatter;
pub mod history_codec;
pub mod identifier;
pub mod playlist_codec;
pub mod subscription_codec;
pub mod tabular;
pub mod transcoder;

pub use formatter::{
    format_history_table, format_library_stats, format_playlists_table,
    format_subscriptions_table, format_support_table, OutputFormat,
};
pub use transcoder::{export_file_name, Collaborators, Outcome, Transcoder};
