//! Image file storage.

use std::future::Future;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error at {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
}

/// Metadata of a stored file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredFile {
    pub len: u64,
    pub modified: SystemTime,
}

/// Where image bytes are kept, addressed by '/'-separated relative paths.
pub trait StorageBackend: Send + Sync {
    /// Human-readable location of `path`, for logs and error messages.
    fn location(&self, path: &str) -> String;

    /// Metadata of the file at `path`, or `None` when nothing is stored there.
    fn stat(&self, path: &str) -> impl Future<Output = Result<Option<StoredFile>, StorageError>> + Send;

    fn read(&self, path: &str) -> impl Future<Output = Result<Vec<u8>, StorageError>> + Send;

    /// Stores `bytes` at `path`, replacing any previous content.
    fn persist(&self, path: &str, bytes: &[u8]) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Stores files under a base directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsStorage {
    base: PathBuf,
}

impl FsStorage {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn full_path(&self, path: &str) -> PathBuf {
        path.split('/')
            .filter(|component| !component.is_empty())
            .fold(self.base.clone(), |full, component| full.join(component))
    }

    fn io_error(&self, path: &str, source: std::io::Error) -> StorageError {
        StorageError::Io {
            location: self.location(path),
            source,
        }
    }
}

impl StorageBackend for FsStorage {
    fn location(&self, path: &str) -> String {
        self.full_path(path).display().to_string()
    }

    async fn stat(&self, path: &str) -> Result<Option<StoredFile>, StorageError> {
        match tokio::fs::metadata(self.full_path(path)).await {
            Ok(metadata) if metadata.is_file() => Ok(Some(StoredFile {
                len: metadata.len(),
                modified: metadata
                    .modified()
                    .map_err(|e| self.io_error(path, e))?,
            })),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(path, e)),
        }
    }

    async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        tokio::fs::read(self.full_path(path))
            .await
            .map_err(|e| self.io_error(path, e))
    }

    async fn persist(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let full_path = self.full_path(path);
        let parent = full_path
            .parent()
            .map_or_else(|| self.base.clone(), Path::to_path_buf);
        tokio::fs::create_dir_all(&parent)
            .await
            .map_err(|e| self.io_error(path, e))?;

        // Each write gets its own temp file next to the target, renamed into
        // place once complete. Dropping it on failure removes it.
        let bytes = bytes.to_vec();
        let written = tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut temp = tempfile::Builder::new()
                .prefix(".retrogallery-")
                .suffix(".part")
                .tempfile_in(&parent)?;
            temp.write_all(&bytes)?;
            temp.persist(&full_path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))
        .and_then(|result| result);

        written.map_err(|e| self.io_error(path, e))
    }
}
