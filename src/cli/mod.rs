//! CLI interface using clap.
//!
//! Provides command-line arguments and subcommands for the tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::application::OutputFormat;
use crate::domain::{DataKind, ImportFormat};

/// yt-transcode - Move subscriptions, playlists and watch history between apps.
///
/// Imports land in a local library; exports read from it.
#[derive(Parser, Debug)]
#[command(name = "yt-transcode")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Listing output: table or json.
    #[arg(long, default_value = "table")]
    pub output_format: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import a file into the local library.
    Import {
        /// What the file holds: subscriptions, playlists or history.
        #[arg(value_parser = parse_kind)]
        kind: DataKind,

        /// File format (see `formats`).
        #[arg(short, long, value_parser = parse_format)]
        format: ImportFormat,

        /// File to import.
        path: PathBuf,
    },

    /// Export the local library to a file.
    Export {
        /// What to export: subscriptions or playlists.
        #[arg(value_parser = parse_kind)]
        kind: DataKind,

        /// File format (see `formats`).
        #[arg(short, long, value_parser = parse_format)]
        format: ImportFormat,

        /// Output file path (auto-generated name if not specified).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List what the local library holds.
    List {
        /// subscriptions, playlists or history.
        #[arg(value_parser = parse_kind)]
        kind: DataKind,

        /// Maximum number of rows to show.
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show which formats can be imported or exported for each kind.
    Formats,

    /// Show library statistics.
    Stats,

    /// Create the default config file if missing and show paths in use.
    Config {
        /// Set the front-end origin used for URLs.
        #[arg(long)]
        origin: Option<String>,

        /// Set the name given to playlists imported without one.
        #[arg(long)]
        placeholder_name: Option<String>,
    },
}

impl Cli {
    /// Parse the listing output argument.
    pub fn output_format(&self) -> Result<OutputFormat, String> {
        self.output_format.parse()
    }
}

fn parse_kind(s: &str) -> Result<DataKind, String> {
    s.parse().map_err(|e: crate::domain::AppError| e.to_string())
}

fn parse_format(s: &str) -> Result<ImportFormat, String> {
    s.parse().map_err(|e: crate::domain::AppError| e.to_string())
}
