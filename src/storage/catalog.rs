//! Catalog reads and writes: runs, kept items and dropped items.

use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::error_handling::DatabaseError;
use crate::item::{DownloadRecord, DownloadStatus, Dropped, ImageItem};

/// Metadata for a crawl run, recorded at start.
pub struct RunMetadata<'a> {
    pub run_id: &'a str,
    pub start_time_ms: i64,
    pub version: &'a str,
    /// Comma-separated site identifiers crawled in this run
    pub sites: &'a str,
}

/// Totals for a completed crawl run, recorded at end.
pub struct RunStats<'a> {
    pub run_id: &'a str,
    pub galleries: i64,
    pub items_kept: i64,
    pub items_dropped: i64,
    pub downloads: i64,
    pub elapsed_seconds: f64,
}

/// Filters for reading items back out of the catalog.
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub run_id: Option<String>,
    pub source_name: Option<String>,
}

/// A kept item as stored, with the run that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: i64,
    pub run_id: String,
    pub observed_at_ms: i64,
    #[serde(flatten)]
    pub item: ImageItem,
}

#[derive(Serialize)]
struct FailureEntry<'a> {
    url: &'a str,
    reason: &'a str,
}

fn to_json<T: Serialize + ?Sized>(column: &'static str, value: &T) -> Result<String, DatabaseError> {
    serde_json::to_string(value).map_err(|source| DatabaseError::JsonColumn { column, source })
}

/// Inserts or updates the run row. Call once at the start of a crawl.
pub async fn insert_run_metadata(
    pool: &SqlitePool,
    meta: &RunMetadata<'_>,
) -> Result<(), DatabaseError> {
    sqlx::query(
        "INSERT INTO runs (run_id, version, sites, start_time_ms)
         VALUES (?, ?, ?, ?)
         ON CONFLICT(run_id) DO UPDATE SET
             version=excluded.version,
             sites=excluded.sites,
             start_time_ms=excluded.start_time_ms",
    )
    .bind(meta.run_id)
    .bind(meta.version)
    .bind(meta.sites)
    .bind(meta.start_time_ms)
    .execute(pool)
    .await?;

    Ok(())
}

/// Records run totals and the end time when a crawl completes.
pub async fn update_run_stats(pool: &SqlitePool, stats: &RunStats<'_>) -> Result<(), DatabaseError> {
    let end_time_ms = chrono::Utc::now().timestamp_millis();

    sqlx::query(
        "UPDATE runs
         SET end_time_ms = ?, galleries = ?, items_kept = ?, items_dropped = ?, downloads = ?,
             elapsed_seconds = ?
         WHERE run_id = ?",
    )
    .bind(end_time_ms)
    .bind(stats.galleries)
    .bind(stats.items_kept)
    .bind(stats.items_dropped)
    .bind(stats.downloads)
    .bind(stats.elapsed_seconds)
    .bind(stats.run_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Records a kept item and its downloads in one transaction.
///
/// Returns the new item id.
pub async fn insert_image_item(
    pool: &SqlitePool,
    run_id: &str,
    item: &ImageItem,
) -> Result<i64, DatabaseError> {
    let observed_at_ms = chrono::Utc::now().timestamp_millis();
    let mut tx = pool.begin().await?;

    let item_id: i64 = sqlx::query(
        "INSERT INTO image_items (
            run_id, source_name, gallery_title, gallery_url, image_title, image_urls,
            observed_at_ms
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING id",
    )
    .bind(run_id)
    .bind(&item.source_name)
    .bind(&item.gallery_title)
    .bind(&item.gallery_url)
    .bind(&item.image_title)
    .bind(to_json("image_urls", &item.image_urls)?)
    .bind(observed_at_ms)
    .fetch_one(&mut *tx)
    .await?
    .get(0);

    for (position, download) in item.downloads.iter().enumerate() {
        sqlx::query(
            "INSERT INTO image_downloads (item_id, position, url, path, checksum, status)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(item_id)
        .bind(position as i64)
        .bind(&download.url)
        .bind(&download.path)
        .bind(&download.checksum)
        .bind(download.status.as_ref())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(item_id)
}

/// Records an item that never reached storage, with each URL's failure.
pub async fn insert_dropped_item(
    pool: &SqlitePool,
    run_id: &str,
    dropped: &Dropped,
) -> Result<i64, DatabaseError> {
    let failures: Vec<FailureEntry<'_>> = dropped
        .failures
        .iter()
        .map(|(url, reason)| FailureEntry { url, reason })
        .collect();

    let id = sqlx::query(
        "INSERT INTO dropped_items (
            run_id, source_name, gallery_title, gallery_url, image_title, image_urls, reason,
            failures, observed_at_ms
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id",
    )
    .bind(run_id)
    .bind(&dropped.item.source_name)
    .bind(&dropped.item.gallery_title)
    .bind(&dropped.item.gallery_url)
    .bind(&dropped.item.image_title)
    .bind(to_json("image_urls", &dropped.item.image_urls)?)
    .bind(dropped.reason.to_string())
    .bind(to_json("failures", &failures)?)
    .bind(chrono::Utc::now().timestamp_millis())
    .fetch_one(pool)
    .await?
    .get(0);

    Ok(id)
}

fn push_filters<'a>(builder: &mut QueryBuilder<'a, Sqlite>, filter: &'a ItemFilter) {
    let mut has_where = false;

    if let Some(run_id) = filter.run_id.as_deref() {
        builder.push(" WHERE run_id = ");
        builder.push_bind(run_id);
        has_where = true;
    }

    if let Some(source_name) = filter.source_name.as_deref() {
        builder.push(if has_where { " AND " } else { " WHERE " });
        builder.push("source_name = ");
        builder.push_bind(source_name);
    }
}

async fn fetch_downloads(pool: &SqlitePool, item_id: i64) -> Result<Vec<DownloadRecord>, DatabaseError> {
    let rows = sqlx::query(
        "SELECT url, path, checksum, status FROM image_downloads
         WHERE item_id = ? ORDER BY position",
    )
    .bind(item_id)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            let status: String = row.get("status");
            let status = status.parse::<DownloadStatus>().map_err(|e| {
                DatabaseError::SqlError(sqlx::Error::Decode(
                    format!("invalid download status '{status}': {e}").into(),
                ))
            })?;
            Ok(DownloadRecord {
                url: row.get("url"),
                path: row.get("path"),
                checksum: row.get("checksum"),
                status,
            })
        })
        .collect()
}

/// Reads kept items back, oldest first, with their downloads in order.
pub async fn query_image_items(
    pool: &SqlitePool,
    filter: &ItemFilter,
) -> Result<Vec<CatalogItem>, DatabaseError> {
    let mut builder = QueryBuilder::new(
        "SELECT id, run_id, source_name, gallery_title, gallery_url, image_title, image_urls,
                observed_at_ms
         FROM image_items",
    );
    push_filters(&mut builder, filter);
    builder.push(" ORDER BY id");

    let rows = builder.build().fetch_all(pool).await?;

    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        let id: i64 = row.get("id");
        let image_urls: String = row.get("image_urls");
        items.push(CatalogItem {
            id,
            run_id: row.get("run_id"),
            observed_at_ms: row.get("observed_at_ms"),
            item: ImageItem {
                source_name: row.get("source_name"),
                gallery_title: row.get("gallery_title"),
                gallery_url: row.get("gallery_url"),
                image_title: row.get("image_title"),
                image_urls: serde_json::from_str(&image_urls).map_err(|source| {
                    DatabaseError::JsonColumn {
                        column: "image_urls",
                        source,
                    }
                })?,
                downloads: fetch_downloads(pool, id).await?,
            },
        });
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{finalize, DownloadOutcome, Finalized};
    use crate::storage::test_helpers::{create_test_pool, create_test_run, image_item, pending_image};

    #[tokio::test]
    async fn test_insert_run_metadata_and_stats() {
        let pool = create_test_pool().await;
        let run_id = create_test_run(&pool, "run_1").await;

        update_run_stats(
            &pool,
            &RunStats {
                run_id: &run_id,
                galleries: 3,
                items_kept: 10,
                items_dropped: 2,
                downloads: 12,
                elapsed_seconds: 4.5,
            },
        )
        .await
        .unwrap();

        let row = sqlx::query(
            "SELECT sites, galleries, items_kept, items_dropped, downloads, end_time_ms FROM runs WHERE run_id = ?",
        )
        .bind(&run_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(row.get::<String, _>("sites"), "oldcrap");
        assert_eq!(row.get::<i64, _>("galleries"), 3);
        assert_eq!(row.get::<i64, _>("items_kept"), 10);
        assert_eq!(row.get::<i64, _>("items_dropped"), 2);
        assert_eq!(row.get::<i64, _>("downloads"), 12);
        assert!(row.get::<Option<i64>, _>("end_time_ms").is_some());
    }

    #[tokio::test]
    async fn test_insert_and_query_image_item() {
        let pool = create_test_pool().await;
        let run_id = create_test_run(&pool, "run_1").await;
        let item = image_item("Keyboard");

        let id = insert_image_item(&pool, &run_id, &item).await.unwrap();
        let items = query_image_items(&pool, &ItemFilter::default()).await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, id);
        assert_eq!(items[0].run_id, "run_1");
        assert_eq!(items[0].item, item);
    }

    #[tokio::test]
    async fn test_query_image_items_filters() {
        let pool = create_test_pool().await;
        create_test_run(&pool, "run_1").await;
        create_test_run(&pool, "run_2").await;

        insert_image_item(&pool, "run_1", &image_item("Front")).await.unwrap();
        let mut other_source = image_item("Back");
        other_source.source_name = "nostalgianerd".to_string();
        insert_image_item(&pool, "run_2", &other_source).await.unwrap();

        let by_run = ItemFilter {
            run_id: Some("run_1".to_string()),
            ..Default::default()
        };
        let items = query_image_items(&pool, &by_run).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item.image_title, "Front");

        let by_source = ItemFilter {
            run_id: Some("run_2".to_string()),
            source_name: Some("nostalgianerd".to_string()),
        };
        let items = query_image_items(&pool, &by_source).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item.image_title, "Back");

        let none = ItemFilter {
            source_name: Some("geocities".to_string()),
            ..Default::default()
        };
        assert!(query_image_items(&pool, &none).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_query_image_items_reports_corrupt_urls() {
        let pool = create_test_pool().await;
        let run_id = create_test_run(&pool, "run_1").await;
        let id = insert_image_item(&pool, &run_id, &image_item("Keyboard")).await.unwrap();
        sqlx::query("UPDATE image_items SET image_urls = 'not json' WHERE id = ?")
            .bind(id)
            .execute(&pool)
            .await
            .unwrap();

        let err = query_image_items(&pool, &ItemFilter::default()).await.unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::JsonColumn {
                column: "image_urls",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_insert_image_item_requires_run() {
        let pool = create_test_pool().await;
        let result = insert_image_item(&pool, "missing_run", &image_item("Front")).await;
        assert!(result.is_err());
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM image_items")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_insert_dropped_item() {
        let pool = create_test_pool().await;
        let run_id = create_test_run(&pool, "run_1").await;
        let outcomes = vec![DownloadOutcome::Failure {
            url: "https://i0.wp.com/oldcrap.org/a.jpeg".to_string(),
            reason: "HTTP status 404".to_string(),
        }];
        let Finalized::Dropped(dropped) = finalize(pending_image("Front"), outcomes) else {
            panic!("expected the item to be dropped");
        };

        insert_dropped_item(&pool, &run_id, &dropped).await.unwrap();

        let row = sqlx::query("SELECT reason, failures FROM dropped_items")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(row.get::<String, _>("reason"), "no successful downloads");
        let failures: serde_json::Value =
            serde_json::from_str(&row.get::<String, _>("failures")).unwrap();
        assert_eq!(failures[0]["reason"], "HTTP status 404");
        assert_eq!(failures[0]["url"], "https://i0.wp.com/oldcrap.org/a.jpeg");
    }
}
