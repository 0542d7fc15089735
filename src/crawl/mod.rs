//! The crawl driver: index pages -> gallery pages -> image items.
//!
//! Index pages are fetched in order on the calling task. Every admitted
//! gallery becomes a spawned task, bounded by a semaphore, that extracts its
//! images, downloads them, and records the kept or dropped items in the
//! catalog.

mod gallery;
mod scope;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use log::{error, info, warn};
use tokio_util::sync::CancellationToken;

use crate::app::{
    log_progress, print_error_statistics, shutdown_gracefully, validate_and_normalize_url,
    CrawlProgress,
};
use crate::config::{Config, LOGGING_INTERVAL};
use crate::download::MediaDownloader;
use crate::error_handling::{ErrorType, ProcessingStats, WarningType};
use crate::fetch::PageFetcher;
use crate::initialization::{init_client, init_semaphore};
use crate::sites::{GallerySite, SiteRegistry};
use crate::storage::{
    init_db_pool_with_path, insert_run_metadata, run_migrations, update_run_stats, FsStorage,
    RunMetadata, RunStats,
};

use gallery::{fetch_galleries, process_gallery, CrawlContext};

pub use scope::{host_allowed, CrawlScope};

/// Results of a crawl run.
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub run_id: String,
    /// Site identifiers crawled, in crawl order
    pub sites: Vec<String>,
    /// Gallery pages fetched and processed
    pub galleries: usize,
    pub items_kept: usize,
    pub items_dropped: usize,
    /// Successful downloads attached to kept items
    pub downloads: usize,
    pub elapsed_seconds: f64,
    pub db_path: PathBuf,
    pub store_dir: PathBuf,
}

struct SitePlan {
    site: Arc<dyn GallerySite>,
    start_urls: Vec<String>,
}

/// Pairs each selected site with the index pages it is crawled from.
///
/// Start URL overrides replace the start URLs of every selected site.
fn plan_sites(sites: Vec<Arc<dyn GallerySite>>, overrides: &[String]) -> Result<Vec<SitePlan>> {
    let override_urls: Vec<String> = overrides
        .iter()
        .filter_map(|url| validate_and_normalize_url(url))
        .collect();
    if !overrides.is_empty() && override_urls.is_empty() {
        bail!("None of the given start URLs is valid");
    }

    sites
        .into_iter()
        .map(|site| {
            let start_urls = if override_urls.is_empty() {
                site.start_urls().to_vec()
            } else {
                override_urls.clone()
            };
            if start_urls.is_empty() {
                bail!("Site '{}' has no start URLs", site.name());
            }
            Ok(SitePlan { site, start_urls })
        })
        .collect()
}

/// Crawls the configured sites from the built-in registry.
///
/// # Errors
///
/// Fails on an unknown site identifier, a site without start URLs, or when
/// the HTTP client or catalog cannot be set up. Problems with individual
/// pages and images are logged and counted instead.
pub async fn run_crawl(config: Config) -> Result<CrawlReport> {
    run_crawl_with_registry(config, &SiteRegistry::with_defaults()).await
}

/// Crawls the configured sites, looking them up in `registry`.
pub async fn run_crawl_with_registry(
    config: Config,
    registry: &SiteRegistry,
) -> Result<CrawlReport> {
    let sites = registry.resolve(&config.sites)?;
    let plans = plan_sites(sites, &config.start_urls)?;
    let site_names: Vec<String> = plans.iter().map(|p| p.site.name().to_string()).collect();

    let start_time = Instant::now();

    let client = init_client(&config).context("Failed to initialize HTTP client")?;
    let fetcher = PageFetcher::new(client);

    let max_connections = u32::try_from(config.max_concurrency).unwrap_or(u32::MAX);
    let pool = init_db_pool_with_path(&config.db_path, max_connections)
        .await
        .context("Failed to initialize catalog database")?;
    run_migrations(&pool)
        .await
        .context("Failed to run catalog migrations")?;

    let start_time_ms = chrono::Utc::now().timestamp_millis();
    let run_id = format!("run_{start_time_ms}");
    insert_run_metadata(
        &pool,
        &RunMetadata {
            run_id: &run_id,
            start_time_ms,
            version: env!("CARGO_PKG_VERSION"),
            sites: &site_names.join(","),
        },
    )
    .await
    .context("Failed to record run metadata")?;

    info!(
        "Starting run {run_id}: {} (storing under {})",
        site_names.join(", "),
        config.store_dir.display()
    );

    let stats = Arc::new(ProcessingStats::new());
    let progress = Arc::new(CrawlProgress::default());
    let storage = Arc::new(FsStorage::new(&config.store_dir));
    let ctx = Arc::new(CrawlContext {
        downloader: MediaDownloader::new(
            fetcher.clone(),
            storage,
            config.expires(),
            Arc::clone(&stats),
        ),
        fetcher,
        pool: Arc::clone(&pool),
        run_id: run_id.clone(),
        stats: Arc::clone(&stats),
        progress: Arc::clone(&progress),
    });

    let cancel = CancellationToken::new();
    let cancel_logging = cancel.child_token();
    let progress_for_logging = Arc::clone(&progress);
    let logging_task = Some(tokio::task::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(LOGGING_INTERVAL));
        // the first tick completes immediately
        interval.tick().await;
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    log_progress(start_time, &progress_for_logging);
                }
                _ = cancel_logging.cancelled() => {
                    break;
                }
            }
        }
    }));

    let semaphore = init_semaphore(config.max_concurrency);
    let mut scope = CrawlScope::new();
    let mut tasks = FuturesUnordered::new();

    'sites: for plan in &plans {
        for start_url in &plan.start_urls {
            let galleries = match fetch_galleries(&ctx.fetcher, plan.site.as_ref(), start_url).await
            {
                Ok(galleries) => galleries,
                Err(e) => {
                    warn!("Failed to fetch index page {start_url}: {e:#}");
                    stats.increment_error(ErrorType::PageFetchError);
                    continue;
                }
            };

            if galleries.is_empty() {
                warn!("No galleries found on index page {start_url}");
                stats.increment_warning(WarningType::EmptyIndexPage);
                continue;
            }
            info!(
                "Found {} galleries on {start_url} ({})",
                galleries.len(),
                plan.site.name()
            );

            for gallery in galleries {
                if !scope.admit(&gallery.url, plan.site.allowed_domains(), &stats) {
                    continue;
                }

                let permit = match Arc::clone(&semaphore).acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        warn!("Semaphore closed, not scheduling gallery {}", gallery.url);
                        break 'sites;
                    }
                };

                let ctx = Arc::clone(&ctx);
                let site = Arc::clone(&plan.site);
                tasks.push(tokio::spawn(async move {
                    let _permit = permit;
                    process_gallery(ctx, site, gallery).await;
                }));
            }
        }
    }

    while let Some(task_result) = tasks.next().await {
        if let Err(join_error) = task_result {
            error!("Gallery task panicked: {join_error:?}");
            stats.increment_error(ErrorType::GalleryTaskPanic);
        }
    }

    shutdown_gracefully(cancel, logging_task).await;

    log_progress(start_time, &progress);

    let elapsed_seconds = start_time.elapsed().as_secs_f64();
    let report = CrawlReport {
        run_id,
        sites: site_names,
        galleries: progress.galleries(),
        items_kept: progress.items_kept(),
        items_dropped: progress.items_dropped(),
        downloads: progress.downloads(),
        elapsed_seconds,
        db_path: config.db_path.clone(),
        store_dir: config.store_dir.clone(),
    };

    update_run_stats(
        &pool,
        &RunStats {
            run_id: &report.run_id,
            galleries: report.galleries as i64,
            items_kept: report.items_kept as i64,
            items_dropped: report.items_dropped as i64,
            downloads: report.downloads as i64,
            elapsed_seconds,
        },
    )
    .await
    .context("Failed to update run statistics")?;

    if let Err(e) = sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
        .execute(pool.as_ref())
        .await
    {
        warn!("Failed to checkpoint WAL file (this is non-critical): {e}");
    }

    print_error_statistics(&stats);
    pool.close().await;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{GalleryRef, PendingImage};
    use crate::sites::{NostalgiaNerd, OldCrap, Page};
    use crate::storage::{query_image_items, ItemFilter};
    use httptest::{matchers::*, responders::*, Expectation, Server, ServerBuilder};
    use scraper::Selector;
    use sqlx::Row;

    /// Minimal site: `a.gallery` links on the index, one item per `img`.
    struct LocalSite {
        start_urls: Vec<String>,
    }

    impl GallerySite for LocalSite {
        fn name(&self) -> &'static str {
            "local"
        }

        fn start_urls(&self) -> &[String] {
            &self.start_urls
        }

        fn allowed_domains(&self) -> &[&'static str] {
            &["127.0.0.1"]
        }

        fn find_galleries<'a>(
            &'a self,
            page: &'a Page,
        ) -> Box<dyn Iterator<Item = GalleryRef> + 'a> {
            let selector = Selector::parse("a.gallery").unwrap();
            let galleries: Vec<GalleryRef> = page
                .document()
                .select(&selector)
                .filter_map(|a| {
                    let url = page.resolve(a.value().attr("href")?)?;
                    Some(GalleryRef::new(a.text().collect::<String>(), url))
                })
                .collect();
            Box::new(galleries.into_iter())
        }

        fn find_images<'a>(
            &'a self,
            page: &'a Page,
            gallery: &'a GalleryRef,
        ) -> Box<dyn Iterator<Item = PendingImage> + 'a> {
            let selector = Selector::parse("img").unwrap();
            let images: Vec<PendingImage> = page
                .document()
                .select(&selector)
                .filter_map(|img| {
                    let url = page.resolve(img.value().attr("src")?)?;
                    let title = img.value().attr("alt").unwrap_or(&gallery.title);
                    Some(gallery.image(self.name(), title, vec![url]))
                })
                .collect();
            Box::new(images.into_iter())
        }
    }

    fn html(body: &str) -> String {
        format!("<html><body>{body}</body></html>")
    }

    /// Test server on the IPv4 loopback that `LocalSite` allows.
    fn local_server() -> Server {
        ServerBuilder::new()
            .bind_addr(([127, 0, 0, 1], 0).into())
            .run()
            .unwrap()
    }

    fn registry_for(server: &Server) -> SiteRegistry {
        let mut registry = SiteRegistry::new();
        registry.register(Arc::new(LocalSite {
            start_urls: vec![server.url_str("/index")],
        }));
        registry
    }

    fn config_in(dir: &std::path::Path) -> Config {
        Config {
            store_dir: dir.join("images"),
            db_path: dir.join("catalog.db"),
            max_concurrency: 2,
            timeout_seconds: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_plan_sites_uses_site_start_urls() {
        let sites: Vec<Arc<dyn GallerySite>> =
            vec![Arc::new(OldCrap::new()), Arc::new(NostalgiaNerd::new())];
        let plans = plan_sites(sites, &[]).unwrap();
        assert_eq!(plans[0].start_urls, ["https://oldcrap.org"]);
        assert_eq!(
            plans[1].start_urls,
            ["https://www.nostalgianerd.com/category/gallery"]
        );
    }

    #[test]
    fn test_plan_sites_overrides_start_urls() {
        let sites: Vec<Arc<dyn GallerySite>> = vec![Arc::new(OldCrap::new())];
        let plans = plan_sites(sites, &["oldcrap.org/page/2/".to_string()]).unwrap();
        assert_eq!(plans[0].start_urls, ["https://oldcrap.org/page/2/"]);
    }

    #[test]
    fn test_plan_sites_rejects_invalid_overrides() {
        let sites: Vec<Arc<dyn GallerySite>> = vec![Arc::new(OldCrap::new())];
        assert!(plan_sites(sites, &["not a url!!!".to_string()]).is_err());
    }

    #[test]
    fn test_plan_sites_requires_start_urls() {
        let sites: Vec<Arc<dyn GallerySite>> = vec![Arc::new(LocalSite {
            start_urls: Vec::new(),
        })];
        let err = plan_sites(sites, &[]).err().unwrap();
        assert!(err.to_string().contains("no start URLs"));
    }

    #[tokio::test]
    async fn test_run_crawl_unknown_site() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            sites: vec!["geocities".to_string()],
            ..config_in(dir.path())
        };
        let err = run_crawl(config).await.err().unwrap();
        assert!(err.to_string().contains("Unknown site 'geocities'"));
        assert!(!dir.path().join("catalog.db").exists());
    }

    #[tokio::test]
    async fn test_run_crawl_end_to_end() {
        let server = local_server();
        let index = html(
            r#"<a class="gallery" href="/g/apple">Apple</a>
               <a class="gallery" href="/g/apple#comments">Apple again</a>
               <a class="gallery" href="/g/empty">Empty</a>
               <a class="gallery" href="https://facebook.com/share">Share</a>
               <a class="gallery">No link</a>"#,
        );
        server.expect(
            Expectation::matching(request::method_path("GET", "/index"))
                .respond_with(status_code(200).body(index)),
        );
        server.expect(
            Expectation::matching(request::method_path("GET", "/g/apple")).respond_with(
                status_code(200).body(html(
                    r#"<img src="/img/apple3.jpg" alt="Apple III">
                       <img src="/img/missing.jpg" alt="Lisa">"#,
                )),
            ),
        );
        server.expect(
            Expectation::matching(request::method_path("GET", "/g/empty"))
                .respond_with(status_code(200).body(html("<p>nothing</p>"))),
        );
        server.expect(
            Expectation::matching(request::method_path("GET", "/img/apple3.jpg"))
                .respond_with(status_code(200).body("apple-bytes")),
        );
        server.expect(
            Expectation::matching(request::method_path("GET", "/img/missing.jpg"))
                .respond_with(status_code(404)),
        );

        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let report = run_crawl_with_registry(config.clone(), &registry_for(&server))
            .await
            .unwrap();

        assert_eq!(report.sites, ["local"]);
        assert_eq!(report.galleries, 2);
        assert_eq!(report.items_kept, 1);
        assert_eq!(report.items_dropped, 1);
        assert_eq!(report.downloads, 1);

        let pool = init_db_pool_with_path(&config.db_path, 1).await.unwrap();
        let items = query_image_items(&pool, &ItemFilter::default()).await.unwrap();
        assert_eq!(items.len(), 1);
        let item = &items[0].item;
        assert_eq!(item.source_name, "local");
        assert_eq!(item.gallery_title, "Apple");
        assert_eq!(item.image_title, "Apple III");
        assert_eq!(item.downloads.len(), 1);

        let stored = config.store_dir.join(&item.downloads[0].path);
        assert_eq!(std::fs::read(stored).unwrap(), b"apple-bytes");
        assert!(item.downloads[0].path.starts_with("local/Apple/Apple III/"));

        let run = sqlx::query("SELECT items_kept, items_dropped, end_time_ms FROM runs WHERE run_id = ?")
            .bind(&report.run_id)
            .fetch_one(pool.as_ref())
            .await
            .unwrap();
        assert_eq!(run.get::<i64, _>("items_kept"), 1);
        assert_eq!(run.get::<i64, _>("items_dropped"), 1);
        assert!(run.get::<Option<i64>, _>("end_time_ms").is_some());

        let dropped: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dropped_items")
            .fetch_one(pool.as_ref())
            .await
            .unwrap();
        assert_eq!(dropped, 1);
    }

    #[tokio::test]
    async fn test_run_crawl_index_failure_is_not_fatal() {
        let server = local_server();
        server.expect(
            Expectation::matching(request::method_path("GET", "/index"))
                .respond_with(status_code(404)),
        );

        let dir = tempfile::tempdir().unwrap();
        let report = run_crawl_with_registry(config_in(dir.path()), &registry_for(&server))
            .await
            .unwrap();
        assert_eq!(report.galleries, 0);
        assert_eq!(report.items_kept, 0);
    }
}
