use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use election_crawler::api::crawl_api;
use election_crawler::api::simple::init_tracing;
use election_crawler::config::{CrawlConfig, DEFAULT_DOWNLOAD_DELAY_SECS, DEFAULT_ROOT_DIR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "UPPER")]
enum LogLevel {
    Critical,
    Error,
    Warning,
    Info,
    Debug,
}

impl LogLevel {
    fn directive(self) -> &'static str {
        match self {
            LogLevel::Critical | LogLevel::Error => "error",
            LogLevel::Warning => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

/// Download the election-results tree, skipping files that are already on disk.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Directory under which all downloaded data is stored
    #[arg(short = 'b', long, default_value = DEFAULT_ROOT_DIR)]
    base_dir: PathBuf,

    /// Minimum delay in seconds after each download
    #[arg(short = 'd', long, default_value_t = DEFAULT_DOWNLOAD_DELAY_SECS)]
    download_delay: f64,

    /// Log output level
    #[arg(short = 'l', long, value_enum, ignore_case = true, default_value = "INFO")]
    log_level: LogLevel,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level.directive());

    let config = CrawlConfig {
        root_dir: cli.base_dir,
        download_delay: cli.download_delay,
        ..CrawlConfig::default()
    };

    if let Err(e) = crawl_api::run(&config).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
