//! Per-gallery work: fetch, extract, download, finalize, record.

use std::sync::Arc;

use anyhow::Result;
use log::{debug, info, warn};

use crate::app::CrawlProgress;
use crate::download::MediaDownloader;
use crate::error_handling::{ErrorType, InfoType, ProcessingStats, WarningType};
use crate::fetch::PageFetcher;
use crate::item::{finalize, Finalized, GalleryRef, PendingImage};
use crate::sites::GallerySite;
use crate::storage::{insert_dropped_item, insert_image_item, DbPool, StorageBackend};

/// Shared state for every gallery task of one run.
pub(crate) struct CrawlContext<S: StorageBackend> {
    pub fetcher: PageFetcher,
    pub downloader: MediaDownloader<S>,
    pub pool: DbPool,
    pub run_id: String,
    pub stats: Arc<ProcessingStats>,
    pub progress: Arc<CrawlProgress>,
}

// The parsed document is dropped before these futures can be suspended
// again, so they stay `Send` and can run inside spawned tasks.

/// Fetches an index page and lists its galleries.
pub(crate) async fn fetch_galleries(
    fetcher: &PageFetcher,
    site: &dyn GallerySite,
    url: &str,
) -> Result<Vec<GalleryRef>> {
    let page = fetcher.fetch_page(url).await?;
    Ok(site.find_galleries(&page).collect())
}

/// Fetches a gallery page and lists its images.
pub(crate) async fn fetch_images(
    fetcher: &PageFetcher,
    site: &dyn GallerySite,
    gallery: &GalleryRef,
) -> Result<Vec<PendingImage>> {
    let page = fetcher.fetch_page(&gallery.url).await?;
    Ok(site.find_images(&page, gallery).collect())
}

/// Processes one gallery end to end. Never fails: problems are logged and counted.
pub(crate) async fn process_gallery<S: StorageBackend>(
    ctx: Arc<CrawlContext<S>>,
    site: Arc<dyn GallerySite>,
    gallery: GalleryRef,
) {
    let images = match fetch_images(&ctx.fetcher, site.as_ref(), &gallery).await {
        Ok(images) => images,
        Err(e) => {
            warn!("Failed to fetch gallery '{}' ({}): {e:#}", gallery.title, gallery.url);
            ctx.stats.increment_error(ErrorType::PageFetchError);
            return;
        }
    };

    if images.is_empty() {
        warn!("No images found in gallery '{}' ({})", gallery.title, gallery.url);
        ctx.stats.increment_warning(WarningType::EmptyGalleryPage);
    } else {
        debug!("Gallery '{}': {} image(s)", gallery.title, images.len());
    }

    for image in images {
        process_item(&ctx, image).await;
    }

    ctx.progress.gallery_done();
}

async fn process_item<S: StorageBackend>(ctx: &CrawlContext<S>, image: PendingImage) {
    let outcomes = ctx.downloader.download_item(&image).await;

    match finalize(image, outcomes) {
        Finalized::Kept(item) => {
            ctx.stats.increment_info(InfoType::ItemKept);
            ctx.progress.item_kept(item.downloads.len());
            if let Err(e) = insert_image_item(&ctx.pool, &ctx.run_id, &item).await {
                warn!("Failed to record item '{}': {e}", item.image_title);
                ctx.stats.increment_error(ErrorType::CatalogWriteError);
            }
        }
        Finalized::Dropped(dropped) => {
            info!(
                "Dropped item '{}' from '{}': {}",
                dropped.item.image_title, dropped.item.gallery_title, dropped.reason
            );
            ctx.stats.increment_info(InfoType::ItemDropped);
            ctx.progress.item_dropped();
            if let Err(e) = insert_dropped_item(&ctx.pool, &ctx.run_id, &dropped).await {
                warn!("Failed to record dropped item '{}': {e}", dropped.item.image_title);
                ctx.stats.increment_error(ErrorType::CatalogWriteError);
            }
        }
    }
}
