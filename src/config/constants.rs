//! Configuration constants.
//!
//! This module defines the constants used as defaults throughout the crawler,
//! including timeouts, retry timing, and size limits.

/// Maximum number of gallery pages processed concurrently.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;
/// Per-request timeout in seconds (pages and images alike).
/// Image files on WordPress CDNs can be several megabytes, so this is more
/// generous than a page-only crawler would need.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Interval between progress log lines, in seconds.
pub const LOGGING_INTERVAL: u64 = 5;

/// Default base directory for stored images.
pub const DEFAULT_STORE_DIR: &str = "./retrogallery";
/// Default path of the SQLite catalog.
pub const DEFAULT_DB_PATH: &str = "./retrogallery.db";

/// Number of days a stored image stays fresh.
///
/// A file already present at its storage path and younger than this is
/// reported as `uptodate` instead of being downloaded again.
pub const DEFAULT_EXPIRES_DAYS: u64 = 90;

/// Default User-Agent string for HTTP requests.
///
/// Users can override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Largest image body accepted, in bytes (64 MiB).
///
/// Bodies announced or streamed past this size are rejected before they are
/// buffered in full.
pub const MAX_IMAGE_BODY_SIZE: usize = 64 * 1024 * 1024;

/// Largest title kept as a single storage path component, in bytes.
/// Most filesystems cap a file name at 255 bytes.
pub const MAX_PATH_COMPONENT_BYTES: usize = 200;

// Error message size limits
/// Maximum failure reason length in characters (1000 chars)
/// Reasons longer than this are truncated before they are recorded in the catalog
pub const MAX_ERROR_MESSAGE_LENGTH: usize = 1000;

// Retry strategy
/// Initial delay in milliseconds before first retry
pub const RETRY_INITIAL_DELAY_MS: u64 = 500;
/// Factor by which retry delay is multiplied on each attempt
pub const RETRY_FACTOR: u64 = 2;
/// Maximum delay between retries in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 15;
/// Maximum number of retries after the initial attempt
pub const RETRY_MAX_ATTEMPTS: usize = 2;

// HTTP status codes (for clarity and consistency)
pub const HTTP_STATUS_TOO_MANY_REQUESTS: u16 = 429;
