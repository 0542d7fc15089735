//! Main application entry point (CLI binary).
//!
//! A thin wrapper around the `retrogallery` library that handles argument
//! parsing, `.env` loading, logger initialization and user-facing output.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use retrogallery::cli::{Cli, Command};
use retrogallery::initialization::init_logger_with;
use retrogallery::{export_jsonl, run_crawl, SiteRegistry};

#[tokio::main]
async fn main() -> Result<()> {
    // .env in the current directory first, then next to the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let cli = Cli::parse();

    init_logger_with(cli.log_level.clone().into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;

    match cli.command {
        Command::Sites => {
            for site in SiteRegistry::with_defaults().iter() {
                println!("{}\t{}", site.name(), site.start_urls().join(" "));
            }
            Ok(())
        }
        Command::Crawl(args) => {
            let config = args.into_config(cli.log_level, cli.log_format);
            match run_crawl(config).await {
                Ok(report) => {
                    println!(
                        "✅ Crawled {} galler{} ({} item{} kept, {} dropped, {} download{}) in {:.1}s",
                        report.galleries,
                        if report.galleries == 1 { "y" } else { "ies" },
                        report.items_kept,
                        if report.items_kept == 1 { "" } else { "s" },
                        report.items_dropped,
                        report.downloads,
                        if report.downloads == 1 { "" } else { "s" },
                        report.elapsed_seconds
                    );
                    println!(
                        "Images stored under {}, catalog in {}",
                        report.store_dir.display(),
                        report.db_path.display()
                    );
                    Ok(())
                }
                Err(e) => {
                    eprintln!("retrogallery error: {:#}", e);
                    process::exit(1);
                }
            }
        }
        Command::Export(args) => match export_jsonl(&args.into()).await {
            Ok(count) => {
                eprintln!("Exported {count} item{}", if count == 1 { "" } else { "s" });
                Ok(())
            }
            Err(e) => {
                eprintln!("retrogallery error: {:#}", e);
                process::exit(1);
            }
        },
    }
}
