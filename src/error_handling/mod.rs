//! Error handling and processing statistics.
//!
//! This module provides:
//! - Error type definitions
//! - Crawl statistics tracking (errors, warnings, info metrics)
//! - Retry strategy configuration
//!
//! Error types are categorized into:
//! - **Errors**: Failures that cost the crawl a page, an image, or a catalog row
//! - **Warnings**: Pages whose structure yielded nothing
//! - **Info**: Informational metrics (download statuses, skipped links, item fates)

mod retry;
mod stats;
mod types;

// Re-export public API
pub use retry::get_retry_strategy;
pub use stats::ProcessingStats;
pub use types::{DatabaseError, ErrorType, InfoType, InitializationError, WarningType};
