//! Gallery and image item data model.
//!
//! Items move through the crawl as immutable values, each stage producing a
//! more complete one:
//!
//! `GalleryRef` (index page) -> `PendingImage` (gallery page) -> `ImageItem`
//! (after downloads), or `Dropped` when no download succeeded.

mod finalize;
mod path;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use finalize::{finalize, DropReason, Dropped, Finalized};
pub use path::{build_storage_path, escape_path_component, PathError};

/// A link from an index page to one gallery page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryRef {
    pub title: String,
    pub url: String,
}

impl GalleryRef {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }

    /// Starts an image item belonging to this gallery.
    pub fn image(
        &self,
        source_name: &str,
        image_title: impl Into<String>,
        image_urls: Vec<String>,
    ) -> PendingImage {
        PendingImage {
            source_name: source_name.to_string(),
            gallery_title: self.title.clone(),
            gallery_url: self.url.clone(),
            image_title: image_title.into(),
            image_urls,
        }
    }
}

/// One logical photograph found on a gallery page, not yet downloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingImage {
    /// Identifier of the site variant that found the image
    pub source_name: String,
    pub gallery_title: String,
    pub gallery_url: String,
    pub image_title: String,
    /// Candidate URLs, deduplicated, in first-seen order
    pub image_urls: Vec<String>,
}

impl PendingImage {
    /// Storage path for one of this item's URLs.
    pub fn storage_path(&self, url: &str) -> Result<String, PathError> {
        build_storage_path(&self.source_name, &self.gallery_title, &self.image_title, url)
    }
}

/// How a successful download came to be stored.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DownloadStatus {
    /// Same storage path already produced earlier in this run
    Cached,
    /// File already stored and still fresh
    Uptodate,
    /// Fetched and written now
    Downloaded,
}

/// A stored image file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRecord {
    pub url: String,
    /// Path relative to the storage base location
    pub path: String,
    /// Lowercase hex SHA-256 of the stored bytes
    pub checksum: String,
    pub status: DownloadStatus,
}

/// Result of trying to store one image URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Success(DownloadRecord),
    Failure { url: String, reason: String },
}

impl DownloadOutcome {
    pub fn url(&self) -> &str {
        match self {
            DownloadOutcome::Success(record) => &record.url,
            DownloadOutcome::Failure { url, .. } => url,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DownloadOutcome::Success(_))
    }
}

/// A finalized item: at least one of its images is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageItem {
    pub source_name: String,
    pub gallery_title: String,
    pub gallery_url: String,
    pub image_title: String,
    pub image_urls: Vec<String>,
    /// Successful downloads in the order they completed
    pub downloads: Vec<DownloadRecord>,
}
