//! Domain-level error types for the transcoder.
//!
//! All errors are typed with `thiserror` and carry enough context to be shown
//! to the user verbatim by the notification layer.

use thiserror::Error;

use super::models::{DataKind, Direction, ImportFormat};

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// No codec exists for this format, data kind and direction.
    #[error("{format} ({mime}) does not support {direction} of {kind}", mime = .format.mime_type())]
    UnsupportedFormat {
        format: ImportFormat,
        kind: DataKind,
        direction: Direction,
    },

    /// Unknown format tag or other invalid caller input.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Input does not have the structural shape of the declared format.
    #[error("Could not decode file: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON parsing or serialization failed.
    #[error("JSON parse error: {message}")]
    JsonParse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Failed to open or query the local library database.
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration or environment error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO operation failed.
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl AppError {
    /// Create an unsupported-format error.
    pub const fn unsupported(format: ImportFormat, kind: DataKind, direction: Direction) -> Self {
        Self::UnsupportedFormat {
            format,
            kind,
            direction,
        }
    }

    /// Create a decode error with an underlying cause.
    pub fn decode(
        message: impl Into<String>,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Decode {
            message: format!("{}: {err}", message.into()),
            source: Some(Box::new(err)),
        }
    }

    /// Create a database error from rusqlite error.
    pub fn database(err: rusqlite::Error) -> Self {
        Self::Database {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Create a JSON parse error.
    pub fn json_parse(err: serde_json::Error) -> Self {
        Self::JsonParse {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create an IO error with context.
    pub fn io(message: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(err),
        }
    }
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_message_names_format_and_mime() {
        let err = AppError::unsupported(
            ImportFormat::YouTubeCsv,
            DataKind::Subscriptions,
            Direction::Export,
        );
        assert_eq!(
            err.to_string(),
            "youtube-csv (text/csv) does not support export of subscriptions"
        );
    }
}
