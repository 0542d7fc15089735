//! Configuration types.
//!
//! This module defines the enums and structs shared by the library API and the
//! command-line front end.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use crate::config::constants::{
    DEFAULT_DB_PATH, DEFAULT_EXPIRES_DAYS, DEFAULT_MAX_CONCURRENCY, DEFAULT_STORE_DIR,
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use retrogallery::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     sites: vec!["oldcrap".to_string()],
///     store_dir: PathBuf::from("/srv/images"),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Site identifiers to crawl; empty means every registered site
    pub sites: Vec<String>,

    /// Start URLs replacing the sites' own index pages
    pub start_urls: Vec<String>,

    /// Base directory images are stored under
    pub store_dir: PathBuf,

    /// Catalog path (SQLite file)
    pub db_path: PathBuf,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Maximum gallery pages processed concurrently
    pub max_concurrency: usize,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Days a stored image stays fresh before it is downloaded again
    pub expires_days: u64,
}

impl Config {
    /// Freshness window for already-stored images.
    pub fn expires(&self) -> Duration {
        Duration::from_secs(self.expires_days.saturating_mul(24 * 60 * 60))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sites: Vec::new(),
            start_urls: Vec::new(),
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            expires_days: DEFAULT_EXPIRES_DAYS,
        }
    }
}
