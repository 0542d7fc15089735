//! Kept/dropped decision for a downloaded item.

use thiserror::Error;

use super::{DownloadOutcome, ImageItem, PendingImage};

/// Why an item never reached storage.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    #[error("no successful downloads")]
    NoSuccessfulDownloads,
}

/// An item that was discarded, with the failure reason of each URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dropped {
    pub item: PendingImage,
    pub reason: DropReason,
    /// `(url, reason)` for every failed URL, in received order
    pub failures: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finalized {
    Kept(ImageItem),
    Dropped(Dropped),
}

/// Decides whether an item is kept, given the outcomes of its downloads.
///
/// Successful records are attached in the order they were received; any
/// failures alongside at least one success are ignored. An item without a
/// single success is dropped.
pub fn finalize(item: PendingImage, outcomes: Vec<DownloadOutcome>) -> Finalized {
    let mut downloads = Vec::new();
    let mut failures = Vec::new();

    for outcome in outcomes {
        match outcome {
            DownloadOutcome::Success(record) => downloads.push(record),
            DownloadOutcome::Failure { url, reason } => failures.push((url, reason)),
        }
    }

    if downloads.is_empty() {
        return Finalized::Dropped(Dropped {
            item,
            reason: DropReason::NoSuccessfulDownloads,
            failures,
        });
    }

    let PendingImage {
        source_name,
        gallery_title,
        gallery_url,
        image_title,
        image_urls,
    } = item;

    Finalized::Kept(ImageItem {
        source_name,
        gallery_title,
        gallery_url,
        image_title,
        image_urls,
        downloads,
    })
}
