//! Export of catalog items.
//!
//! Kept items are written as JSON Lines: one object per item with its
//! download records nested, oldest first.

mod jsonl;
mod writer;

use std::path::PathBuf;

pub use jsonl::{export_jsonl, write_jsonl};

/// Options for exporting catalog items.
#[derive(Clone, Debug, Default)]
pub struct ExportOptions {
    /// Catalog path
    pub db_path: PathBuf,
    /// Output file path (or stdout if None)
    pub output: Option<PathBuf>,
    /// Only items from this run
    pub run_id: Option<String>,
    /// Only items from this site
    pub source: Option<String>,
}
