//! Catalog schema migrations, embedded from `migrations/` at build time.

use sqlx::SqlitePool;

use crate::error_handling::DatabaseError;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Brings the catalog schema up to date.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DatabaseError> {
    MIGRATOR.run(pool).await?;
    Ok(())
}
