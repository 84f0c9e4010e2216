//! File-backed byte streams.
//!
//! Missing or unreadable files open as `None` so the caller can report the
//! locator as unavailable instead of failing.

use std::io::ErrorKind;
use std::path::Path;

use async_trait::async_trait;
use tokio::fs::{self, File};

use crate::domain::{AppError, ByteSink, ByteSource, Reader, Result, Writer};

/// Reads import files from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource;

#[async_trait]
impl ByteSource for FileSource {
    async fn open(&self, locator: &Path) -> Result<Option<Reader>> {
        match File::open(locator).await {
            Ok(file) => Ok(Some(Box::new(file))),
            Err(e) if is_unavailable(e.kind()) => {
                tracing::debug!(path = %locator.display(), error = %e, "Source unavailable");
                Ok(None)
            }
            Err(e) => Err(AppError::io(
                format!("Failed to open {}", locator.display()),
                e,
            )),
        }
    }
}

/// Writes export files to the local filesystem, creating parent directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSink;

#[async_trait]
impl ByteSink for FileSink {
    async fn open(&self, locator: &Path) -> Result<Option<Writer>> {
        if let Some(parent) = locator.parent().filter(|p| !p.as_os_str().is_empty()) {
            match fs::create_dir_all(parent).await {
                Ok(()) => {}
                Err(e) if is_unavailable(e.kind()) => {
                    tracing::debug!(path = %parent.display(), error = %e, "Sink directory unavailable");
                    return Ok(None);
                }
                Err(e) => {
                    return Err(AppError::io(
                        format!("Failed to create {}", parent.display()),
                        e,
                    ))
                }
            }
        }

        match File::create(locator).await {
            Ok(file) => Ok(Some(Box::new(file))),
            Err(e) if is_unavailable(e.kind()) => {
                tracing::debug!(path = %locator.display(), error = %e, "Sink unavailable");
                Ok(None)
            }
            Err(e) => Err(AppError::io(
                format!("Failed to create {}", locator.display()),
                e,
            )),
        }
    }
}

const fn is_unavailable(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::NotFound | ErrorKind::PermissionDenied)
}
