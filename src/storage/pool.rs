//! Catalog connection pool.
//!
//! The pool is configured with:
//! - WAL journal mode so exports can read while a crawl writes
//! - Foreign keys enforced
//! - Automatic database file (and parent directory) creation

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use log::{error, info};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::error_handling::DatabaseError;

/// Shared handle to the catalog pool.
pub type DbPool = Arc<SqlitePool>;

/// Opens the catalog at `db_path`, creating the file when it does not exist.
///
/// # Errors
///
/// Returns `DatabaseError::FileCreationError` when the parent directory cannot
/// be created and `DatabaseError::SqlError` when connecting fails.
pub async fn init_db_pool_with_path(
    db_path: &Path,
    max_connections: u32,
) -> Result<DbPool, DatabaseError> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            error!("Failed to create database directory {}: {e}", parent.display());
            return Err(DatabaseError::FileCreationError(e.to_string()));
        }
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect_with(options)
        .await
        .map_err(|e| {
            error!("Failed to connect to database {}: {e}", db_path.display());
            DatabaseError::SqlError(e)
        })?;

    info!("Catalog database opened at {}", db_path.display());
    Ok(Arc::new(pool))
}

/// Opens an existing catalog for reading.
///
/// Nothing is created: a missing file is reported as
/// `DatabaseError::CatalogNotFound` and a database without the catalog tables
/// as `DatabaseError::NotACatalog`.
pub async fn open_catalog_read_only(db_path: &Path) -> Result<DbPool, DatabaseError> {
    if !tokio::fs::try_exists(db_path).await.unwrap_or(false) {
        return Err(DatabaseError::CatalogNotFound(db_path.display().to_string()));
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
        .create_if_missing(false)
        .read_only(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    let has_items: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'image_items')",
    )
    .fetch_one(&pool)
    .await?;
    if !has_items {
        pool.close().await;
        return Err(DatabaseError::NotACatalog(db_path.display().to_string()));
    }

    Ok(Arc::new(pool))
}
