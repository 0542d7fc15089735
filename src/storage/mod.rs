//! Persistence: image files and the SQLite catalog.
//!
//! - `files`: the `StorageBackend` seam and the local filesystem backend
//! - `catalog`: runs, kept items and dropped items
//! - `pool` / `migrations`: catalog connection and schema

mod catalog;
mod files;
mod migrations;
mod pool;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use catalog::{
    insert_dropped_item, insert_image_item, insert_run_metadata, query_image_items,
    update_run_stats, CatalogItem, ItemFilter, RunMetadata, RunStats,
};
pub use files::{FsStorage, StorageBackend, StorageError, StoredFile};
pub use migrations::run_migrations;
pub use pool::{init_db_pool_with_path, open_catalog_read_only, DbPool};
