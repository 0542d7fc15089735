//! Run-level helpers: start URL validation, progress logging, shutdown and
//! final statistics.

pub mod logging;
pub mod shutdown;
pub mod statistics;
pub mod url;

pub use logging::{log_progress, CrawlProgress};
pub use shutdown::shutdown_gracefully;
pub use statistics::print_error_statistics;
pub use url::validate_and_normalize_url;
