//! JSON Lines export of kept items.

use std::io::{self, Write};

use anyhow::{Context, Result};

use crate::storage::{open_catalog_read_only, query_image_items, CatalogItem, ItemFilter};

use super::writer::IgnoreBrokenPipe;
use super::ExportOptions;

/// Writes one JSON object per item, each on its own line.
pub fn write_jsonl<W: Write>(items: &[CatalogItem], writer: &mut W) -> Result<usize> {
    for item in items {
        serde_json::to_writer(&mut *writer, item).context("Failed to serialize item")?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(items.len())
}

/// Exports kept items from the catalog to JSONL.
///
/// Writes to `opts.output`, or stdout when unset. Returns the number of items
/// exported. The catalog is opened read-only and must already exist.
pub async fn export_jsonl(opts: &ExportOptions) -> Result<usize> {
    let pool = open_catalog_read_only(&opts.db_path).await?;

    let filter = ItemFilter {
        run_id: opts.run_id.clone(),
        source_name: opts.source.clone(),
    };
    let items = query_image_items(&pool, &filter)
        .await
        .context("Failed to read items from catalog")?;
    pool.close().await;

    let mut writer: Box<dyn Write> = if let Some(output_path) = opts.output.as_ref() {
        let file = tokio::fs::File::create(output_path)
            .await
            .with_context(|| format!("Failed to create output file: {}", output_path.display()))?
            .into_std()
            .await;
        Box::new(io::BufWriter::new(file))
    } else {
        Box::new(IgnoreBrokenPipe::new(io::stdout()))
    };

    write_jsonl(&items, &mut writer)
}
