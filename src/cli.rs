//! Command-line interface.
//!
//! ```bash
//! # Crawl every registered site
//! retrogallery crawl
//!
//! # Crawl one site from a later index page, storing under /srv/images
//! retrogallery crawl oldcrap --start-url https://oldcrap.org/page/2/ --store /srv/images
//!
//! # List the registered sites
//! retrogallery sites
//!
//! # Export the kept items of one run
//! retrogallery export --run-id run_1704067200000 --output items.jsonl
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{
    Config, LogFormat, LogLevel, DEFAULT_DB_PATH, DEFAULT_EXPIRES_DAYS, DEFAULT_MAX_CONCURRENCY,
    DEFAULT_STORE_DIR, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use crate::export::ExportOptions;

#[derive(Debug, Parser)]
#[command(
    name = "retrogallery",
    version,
    about = "Crawls retro-computing photo galleries and stores the images."
)]
pub struct Cli {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Crawl gallery sites and download their images
    Crawl(CrawlArgs),
    /// List the registered sites and their start URLs
    Sites,
    /// Write kept items from the catalog as JSON Lines
    Export(ExportArgs),
}

#[derive(Debug, Args)]
pub struct CrawlArgs {
    /// Sites to crawl (default: all)
    #[arg(value_name = "SITE")]
    pub sites: Vec<String>,

    /// Index page to start from instead of the sites' own (repeatable)
    #[arg(long = "start-url", value_name = "URL")]
    pub start_urls: Vec<String>,

    /// Base directory images are stored under
    #[arg(long = "store", value_name = "DIR", default_value = DEFAULT_STORE_DIR)]
    pub store_dir: PathBuf,

    /// Catalog path (SQLite file)
    #[arg(long, value_parser, default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    /// Maximum gallery pages processed concurrently
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Days a stored image stays fresh before it is downloaded again
    #[arg(long, default_value_t = DEFAULT_EXPIRES_DAYS)]
    pub expires_days: u64,
}

impl CrawlArgs {
    pub fn into_config(self, log_level: LogLevel, log_format: LogFormat) -> Config {
        Config {
            sites: self.sites,
            start_urls: self.start_urls,
            store_dir: self.store_dir,
            db_path: self.db_path,
            log_level,
            log_format,
            max_concurrency: self.max_concurrency,
            timeout_seconds: self.timeout_seconds,
            user_agent: self.user_agent,
            expires_days: self.expires_days,
        }
    }
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Catalog path (SQLite file)
    #[arg(long, value_parser, default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    /// Output file (default: stdout)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Only items from this run
    #[arg(long)]
    pub run_id: Option<String>,

    /// Only items from this site
    #[arg(long)]
    pub source: Option<String>,
}

impl From<ExportArgs> for ExportOptions {
    fn from(args: ExportArgs) -> Self {
        ExportOptions {
            db_path: args.db_path,
            output: args.output,
            run_id: args.run_id,
            source: args.source,
        }
    }
}
