//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared resources of a crawl:
//! - Logger
//! - HTTP client
//! - Concurrency limiter

mod client;
mod logger;

use std::sync::Arc;

use tokio::sync::Semaphore;

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;

/// Initializes a semaphore for controlling concurrency.
///
/// Limits how many gallery pages are processed at the same time. A count of
/// zero is raised to one so the crawl can make progress.
pub fn init_semaphore(count: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(count.max(1)))
}
