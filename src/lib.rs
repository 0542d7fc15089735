//! retrogallery library: crawling retro-computing image galleries
//!
//! Index pages of each registered site are parsed for gallery links; every
//! gallery page is parsed for images, each image group becomes an item whose
//! URLs are downloaded into a content-addressed layout
//! (`site/gallery title/image title/<sha1 of url><ext>`), and the kept or
//! dropped items are recorded in a SQLite catalog.
//!
//! # Example
//!
//! ```no_run
//! use retrogallery::{run_crawl, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     sites: vec!["oldcrap".to_string()],
//!     store_dir: std::path::PathBuf::from("./images"),
//!     ..Default::default()
//! };
//!
//! let report = run_crawl(config).await?;
//! println!("{} items kept, {} dropped", report.items_kept, report.items_dropped);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

mod app;
pub mod cli;
pub mod config;
pub mod crawl;
pub mod download;
pub mod error_handling;
pub mod export;
pub mod extract;
pub mod fetch;
pub mod initialization;
pub mod item;
pub mod sites;
pub mod storage;
pub mod title;
mod utils;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use crawl::{run_crawl, run_crawl_with_registry, CrawlReport};
pub use export::{export_jsonl, ExportOptions};
pub use sites::{GallerySite, Page, SiteRegistry};
