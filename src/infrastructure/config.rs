//! Configuration file management.
//!
//! Handles loading and saving TOML configuration files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{AppConfig, AppError, Result};

/// Default configuration file content.
const DEFAULT_CONFIG: &str = r#"# yt-transcode configuration
# Auto-generated - edit as needed

[frontend]
# Origin stripped from imported URLs and prefixed to exported ones
origin = "https://www.youtube.com"

# Thumbnail host and quality used for watch history entries
thumbnail_host = "https://i.ytimg.com"
thumbnail_quality = "hqdefault"

[playlists]
# Name given to imported playlists whose file carries none
placeholder_name = "Imported playlist"

[account]
# Token handed to the subscription store on export (optional)
# auth_token = "..."

[paths]
# Custom data directory (optional, defaults to ~/.yt-transcode)
# data_dir = "/custom/path"
"#;

/// Load configuration from file or create default.
///
/// # Errors
/// Returns error if file exists but cannot be read or parsed.
pub fn load_config() -> Result<AppConfig> {
    let config_path = config_file_path();

    if config_path.exists() {
        load_config_from_file(&config_path)
    } else {
        Ok(AppConfig::default())
    }
}

/// Load configuration from a specific file.
///
/// # Errors
/// Returns error if file cannot be read or parsed.
pub fn load_config_from_file(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to read config file: {}", path.display()), e))?;

    toml::from_str(&content).map_err(|e| AppError::Config {
        message: format!("Failed to parse config file: {e}"),
    })
}

/// Save configuration to the file `load_config` reads.
///
/// # Errors
/// Returns error if file cannot be written.
pub fn save_config(config: &AppConfig) -> Result<PathBuf> {
    let config_path = config_file_path();
    save_config_to_file(config, &config_path)?;
    Ok(config_path)
}

/// Save configuration to a specific file.
///
/// # Errors
/// Returns error if file cannot be written.
pub fn save_config_to_file(config: &AppConfig, config_path: &Path) -> Result<()> {
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::io("Failed to create config directory", e))?;
    }

    let content = toml::to_string_pretty(config).map_err(|e| AppError::Config {
        message: format!("Failed to serialize config: {e}"),
    })?;

    fs::write(config_path, content).map_err(|e| {
        AppError::io(
            format!("Failed to write config file: {}", config_path.display()),
            e,
        )
    })?;

    tracing::info!(path = %config_path.display(), "Configuration saved");

    Ok(())
}

/// Create default configuration file if it doesn't exist.
///
/// # Errors
/// Returns error if file cannot be created.
pub fn ensure_config_exists() -> Result<PathBuf> {
    let config_path = config_file_path();

    if !config_path.exists() {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::io("Failed to create config directory", e))?;
        }

        fs::write(&config_path, DEFAULT_CONFIG)
            .map_err(|e| AppError::io("Failed to create default config", e))?;

        tracing::info!(path = %config_path.display(), "Created default configuration");
    }

    Ok(config_path)
}

/// Get the path to the configuration file.
#[must_use]
pub fn config_file_path() -> PathBuf {
    AppConfig::config_file_path()
}
