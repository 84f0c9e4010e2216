//! yt-transcode - Move YouTube subscriptions, playlists and watch history
//! between NewPipe, FreeTube, Piped and Google Takeout exports.
//!
//! Imported records land in a local `SQLite` library; exports are produced
//! from that library in any supported format.
//!
//! QUICK START:
//!   yt-transcode formats                                        # What goes where
//!   yt-transcode import subscriptions -f youtube-csv subs.csv   # Takeout CSV
//!   yt-transcode import history -f youtube-json history.json    # Takeout JSON
//!   yt-transcode export subscriptions -f newpipe                # Auto-named file
//!   yt-transcode list playlists                                 # Library contents

mod application;
mod cli;
mod domain;
mod infrastructure;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use application::{
    export_file_name, format_history_table, format_library_stats, format_playlists_table,
    format_subscriptions_table, format_support_table, Collaborators, Outcome, OutputFormat,
    Transcoder,
};
use cli::{Cli, Commands};
use domain::{AppConfig, AppError, DataKind, ImportFormat};
use infrastructure::{ConsoleNotifier, FileSink, FileSource, LocalStorage};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

/// Main application logic. Returns `false` when a transcoding call failed.
async fn run(cli: Cli) -> anyhow::Result<bool> {
    let output = cli
        .output_format()
        .map_err(|message| AppError::InvalidArgument { message })?;
    let config = infrastructure::load_config().context("Failed to load configuration")?;

    match cli.command {
        Commands::Import { kind, format, path } => cmd_import(&config, kind, format, &path).await,
        Commands::Export {
            kind,
            format,
            output,
        } => cmd_export(&config, kind, format, output).await,
        Commands::List { kind, limit } => {
            cmd_list(&config, kind, limit, output)?;
            Ok(true)
        }
        Commands::Formats => {
            println!("{}", format_support_table());
            Ok(true)
        }
        Commands::Stats => {
            cmd_stats(&config)?;
            Ok(true)
        }
        Commands::Config {
            origin,
            placeholder_name,
        } => {
            cmd_config(config, origin, placeholder_name)?;
            Ok(true)
        }
    }
}

fn open_library(config: &AppConfig) -> anyhow::Result<LocalStorage> {
    let path = config.library_db_path();
    let storage = LocalStorage::open(&path)
        .with_context(|| format!("Failed to open library at {}", path.display()))?;
    Ok(storage.with_frontend(config.frontend.clone()))
}

/// Import a file into the library.
async fn cmd_import(
    config: &AppConfig,
    kind: DataKind,
    format: ImportFormat,
    path: &std::path::Path,
) -> anyhow::Result<bool> {
    let storage = open_library(config)?;
    let (source, sink, notifier) = (FileSource, FileSink, ConsoleNotifier);
    let transcoder = Transcoder::new(
        config,
        Collaborators {
            source: &source,
            sink: &sink,
            subscriptions: &storage,
            playlists: &storage,
            history: &storage,
            notifier: &notifier,
        },
    );

    let outcome = transcoder.import(kind, format, path).await;

    Ok(!matches!(outcome, Outcome::Failed { .. }))
}

/// Export the library to a file.
async fn cmd_export(
    config: &AppConfig,
    kind: DataKind,
    format: ImportFormat,
    output: Option<PathBuf>,
) -> anyhow::Result<bool> {
    let path = output.unwrap_or_else(|| PathBuf::from(export_file_name(kind, format, Utc::now())));
    let storage = open_library(config)?;
    let (source, sink, notifier) = (FileSource, FileSink, ConsoleNotifier);
    let transcoder = Transcoder::new(
        config,
        Collaborators {
            source: &source,
            sink: &sink,
            subscriptions: &storage,
            playlists: &storage,
            history: &storage,
            notifier: &notifier,
        },
    );

    let outcome = transcoder.export(kind, format, &path).await;

    match outcome {
        Outcome::Completed { .. } => {
            println!("  {} {}", "→".cyan(), path.display());
            Ok(true)
        }
        Outcome::Unavailable => {
            eprintln!("{} Could not write {}", "✗".red(), path.display());
            Ok(false)
        }
        Outcome::Empty => Ok(true),
        Outcome::Failed { .. } => Ok(false),
    }
}

/// List library contents.
fn cmd_list(
    config: &AppConfig,
    kind: DataKind,
    limit: usize,
    output: OutputFormat,
) -> anyhow::Result<()> {
    let storage = open_library(config)?;

    let rendered = match kind {
        DataKind::Subscriptions => {
            let mut subs = storage.get_subscriptions()?;
            subs.truncate(limit);
            match output {
                OutputFormat::Table => format_subscriptions_table(&subs),
                OutputFormat::Json => serde_json::to_string_pretty(&subs)?,
            }
        }
        DataKind::Playlists => {
            let mut playlists = storage.get_playlists()?;
            playlists.truncate(limit);
            match output {
                OutputFormat::Table => format_playlists_table(&playlists),
                OutputFormat::Json => serde_json::to_string_pretty(&playlists)?,
            }
        }
        DataKind::WatchHistory => {
            let history = storage.get_history(Some(limit))?;
            match output {
                OutputFormat::Table => format_history_table(&history),
                OutputFormat::Json => serde_json::to_string_pretty(&history)?,
            }
        }
    };

    println!("{rendered}");
    Ok(())
}

/// Show library statistics.
fn cmd_stats(config: &AppConfig) -> anyhow::Result<()> {
    let storage = open_library(config)?;
    let (subscriptions, playlists, history) = storage.counts()?;

    println!("{}", format_library_stats(subscriptions, playlists, history));
    Ok(())
}

/// Ensure the config file exists, apply any changes and show paths.
fn cmd_config(
    mut config: AppConfig,
    origin: Option<String>,
    placeholder_name: Option<String>,
) -> anyhow::Result<()> {
    let mut config_path =
        infrastructure::ensure_config_exists().context("Failed to create default config")?;

    if origin.is_some() || placeholder_name.is_some() {
        if let Some(origin) = origin {
            config.frontend.origin = origin;
        }
        if let Some(name) = placeholder_name {
            config.playlists.placeholder_name = name;
        }
        config_path =
            infrastructure::save_config(&config).context("Failed to save configuration")?;
    }

    println!("{}", "📁 Paths".bold());
    println!("  Config:  {}", config_path.display().to_string().cyan());
    println!(
        "  Library: {}",
        config.library_db_path().display().to_string().cyan()
    );
    println!("  Origin:  {}", config.frontend.origin.green());

    Ok(())
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
