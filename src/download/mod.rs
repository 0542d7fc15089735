//! Image downloading into content-addressed storage.
//!
//! Each image URL ends in exactly one [`DownloadOutcome`]:
//! - `cached`: the same storage path was already produced earlier in this run
//! - `uptodate`: a file is stored at the path and is younger than the expiry
//! - `downloaded`: the bytes were fetched and written now
//! - a failure with its reason, for anything else

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, SystemTime};

use log::{debug, warn};
use sha2::{Digest, Sha256};
use tokio::sync::Mutex as AsyncMutex;

use crate::error_handling::{ErrorType, InfoType, ProcessingStats};
use crate::fetch::PageFetcher;
use crate::item::{DownloadOutcome, DownloadRecord, DownloadStatus, PendingImage};
use crate::storage::{StorageBackend, StoredFile};
use crate::utils::sanitize_and_truncate_error_message;

/// Lowercase hex SHA-256 of `bytes`.
pub fn checksum(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

pub struct MediaDownloader<S: StorageBackend> {
    fetcher: PageFetcher,
    storage: Arc<S>,
    expires: Duration,
    stats: Arc<ProcessingStats>,
    /// One slot per storage path seen in this run, holding the checksum once
    /// the path has been produced
    produced: Mutex<HashMap<String, PathSlot>>,
}

type PathSlot = Arc<AsyncMutex<Option<String>>>;

impl<S: StorageBackend> MediaDownloader<S> {
    pub fn new(
        fetcher: PageFetcher,
        storage: Arc<S>,
        expires: Duration,
        stats: Arc<ProcessingStats>,
    ) -> Self {
        Self {
            fetcher,
            storage,
            expires,
            stats,
            produced: Mutex::new(HashMap::new()),
        }
    }

    fn path_slot(&self, path: &str) -> PathSlot {
        self.produced
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(path.to_string())
            .or_default()
            .clone()
    }

    fn is_fresh(&self, file: &StoredFile) -> bool {
        SystemTime::now()
            .duration_since(file.modified)
            .map(|age| age < self.expires)
            // Modified in the future (clock skew): treat as fresh.
            .unwrap_or(true)
    }

    fn success(&self, url: &str, path: &str, checksum: String, status: DownloadStatus) -> DownloadOutcome {
        self.stats.increment_info(match status {
            DownloadStatus::Cached => InfoType::DownloadCached,
            DownloadStatus::Uptodate => InfoType::DownloadUptodate,
            DownloadStatus::Downloaded => InfoType::DownloadDownloaded,
        });
        debug!("{status}: {url} -> {path}");
        DownloadOutcome::Success(DownloadRecord {
            url: url.to_string(),
            path: path.to_string(),
            checksum,
            status,
        })
    }

    fn failure(&self, url: &str, error_type: ErrorType, reason: &str) -> DownloadOutcome {
        self.stats.increment_error(error_type);
        let reason = sanitize_and_truncate_error_message(reason);
        warn!("{error_type}: {reason}");
        DownloadOutcome::Failure {
            url: url.to_string(),
            reason,
        }
    }

    /// Stores the image at `url` under `path`.
    pub async fn download(&self, url: &str, path: &str) -> DownloadOutcome {
        self.download_with_referer(url, path, None).await
    }

    /// Stores the image at `url` under `path`, sending the page it was found
    /// on as the referer.
    ///
    /// Concurrent calls for the same path run one at a time; once one of them
    /// has stored the file the others report `cached`.
    pub async fn download_with_referer(
        &self,
        url: &str,
        path: &str,
        referer: Option<&str>,
    ) -> DownloadOutcome {
        let slot = self.path_slot(path);
        let mut produced = slot.lock().await;
        if let Some(checksum) = produced.as_ref() {
            return self.success(url, path, checksum.clone(), DownloadStatus::Cached);
        }

        let outcome = self.store(url, path, referer).await;
        if let DownloadOutcome::Success(record) = &outcome {
            *produced = Some(record.checksum.clone());
        }
        outcome
    }

    async fn store(&self, url: &str, path: &str, referer: Option<&str>) -> DownloadOutcome {
        match self.storage.stat(path).await {
            Ok(Some(file)) if self.is_fresh(&file) => match self.storage.read(path).await {
                Ok(bytes) => {
                    return self.success(url, path, checksum(&bytes), DownloadStatus::Uptodate)
                }
                Err(e) => warn!("Re-downloading unreadable stored file: {e}"),
            },
            Ok(_) => {}
            Err(e) => warn!("Could not inspect stored file, downloading again: {e}"),
        }

        let bytes = match self.fetcher.fetch_bytes(url, referer).await {
            Ok(bytes) => bytes,
            Err(e) => return self.failure(url, ErrorType::ImageDownloadError, &format!("{e:#}")),
        };

        if let Err(e) = self.storage.persist(path, &bytes).await {
            return self.failure(url, ErrorType::StorageWriteError, &e.to_string());
        }

        self.success(url, path, checksum(&bytes), DownloadStatus::Downloaded)
    }

    /// Downloads every URL of an item, one after another.
    ///
    /// Outcomes are returned in URL order. A URL whose storage path cannot be
    /// built fails without being requested.
    pub async fn download_item(&self, item: &PendingImage) -> Vec<DownloadOutcome> {
        let mut outcomes = Vec::with_capacity(item.image_urls.len());

        for url in &item.image_urls {
            let outcome = match item.storage_path(url) {
                Ok(path) => {
                    self.download_with_referer(url, &path, Some(&item.gallery_url))
                        .await
                }
                Err(e) => self.failure(
                    url,
                    ErrorType::StoragePathError,
                    &format!("{e} for {url}"),
                ),
            };
            outcomes.push(outcome);
        }

        outcomes
    }
}
