//! Progress counters and the periodic progress line.

use log::info;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters shared by all gallery tasks of a crawl.
#[derive(Debug, Default)]
pub struct CrawlProgress {
    pub galleries: AtomicUsize,
    pub items_kept: AtomicUsize,
    pub items_dropped: AtomicUsize,
    pub downloads: AtomicUsize,
}

impl CrawlProgress {
    pub fn gallery_done(&self) {
        self.galleries.fetch_add(1, Ordering::SeqCst);
    }

    pub fn item_kept(&self, downloads: usize) {
        self.items_kept.fetch_add(1, Ordering::SeqCst);
        self.downloads.fetch_add(downloads, Ordering::SeqCst);
    }

    pub fn item_dropped(&self) {
        self.items_dropped.fetch_add(1, Ordering::SeqCst);
    }

    pub fn galleries(&self) -> usize {
        self.galleries.load(Ordering::SeqCst)
    }

    pub fn items_kept(&self) -> usize {
        self.items_kept.load(Ordering::SeqCst)
    }

    pub fn items_dropped(&self) -> usize {
        self.items_dropped.load(Ordering::SeqCst)
    }

    pub fn downloads(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

/// Logs galleries done, items kept and dropped, and the item rate.
pub fn log_progress(start_time: std::time::Instant, progress: &CrawlProgress) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let items = progress.items_kept() + progress.items_dropped();
    let rate = if elapsed_secs > 0.0 {
        items as f64 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "Processed {} galleries, {} items ({} kept, {} dropped) in {:.2} seconds (~{:.2} items/sec)",
        progress.galleries(),
        items,
        progress.items_kept(),
        progress.items_dropped(),
        elapsed_secs,
        rate
    );
}
