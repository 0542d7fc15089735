//! Shared helpers for catalog tests.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::item::{DownloadRecord, DownloadStatus, ImageItem, PendingImage};
use crate::storage::{insert_run_metadata, run_migrations, RunMetadata};

/// Creates an in-memory catalog with migrations applied.
///
/// The pool holds a single connection: every new connection to
/// `sqlite::memory:` would open a separate, empty database.
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Inserts a run row and returns its id.
pub async fn create_test_run(pool: &SqlitePool, run_id: &str) -> String {
    insert_run_metadata(
        pool,
        &RunMetadata {
            run_id,
            start_time_ms: 1_704_067_200_000,
            version: "0.1.0",
            sites: "oldcrap",
        },
    )
    .await
    .expect("Failed to insert test run");
    run_id.to_string()
}

pub fn pending_image(image_title: &str) -> PendingImage {
    PendingImage {
        source_name: "oldcrap".to_string(),
        gallery_title: "Robotron KC85/3".to_string(),
        gallery_url: "https://oldcrap.org/2017/12/06/robotron-kc85-3/".to_string(),
        image_title: image_title.to_string(),
        image_urls: vec![
            "https://i0.wp.com/oldcrap.org/a.jpeg".to_string(),
            "https://i0.wp.com/oldcrap.org/b.jpeg".to_string(),
        ],
    }
}

pub fn image_item(image_title: &str) -> ImageItem {
    let pending = pending_image(image_title);
    let downloads = vec![DownloadRecord {
        url: pending.image_urls[0].clone(),
        path: pending
            .storage_path(&pending.image_urls[0])
            .expect("test titles are non-empty"),
        checksum: "ab".repeat(32),
        status: DownloadStatus::Downloaded,
    }];
    ImageItem {
        source_name: pending.source_name,
        gallery_title: pending.gallery_title,
        gallery_url: pending.gallery_url,
        image_title: pending.image_title,
        image_urls: pending.image_urls,
        downloads,
    }
}
