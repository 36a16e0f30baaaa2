use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::CrawlConfig;
use crate::engine::cache::JsonCache;
use crate::engine::crawler::Crawler;
use crate::engine::layout::{Endpoints, StorageLayout};
use crate::engine::retry::RetryPolicy;
use crate::engine::stats::{StatsCollector, StatsSnapshot};
use crate::source::http_source::HttpSource;
use crate::source::paced_source::PacedSource;
use crate::source::traits::ResultSource;

/// Build the HTTP session and run one full traversal.
pub async fn run(config: &CrawlConfig) -> Result<StatsSnapshot> {
    config.validate()?;
    let http = HttpSource::new(&config.user_agent, config.request_timeout()?)
        .context("building http client")?;
    run_with_source(config, Arc::new(http)).await
}

/// Same as [`run`] with a caller-supplied source; the download delay is still applied.
pub async fn run_with_source(
    config: &CrawlConfig,
    source: Arc<dyn ResultSource>,
) -> Result<StatsSnapshot> {
    config.validate()?;

    let paced: Arc<dyn ResultSource> = Arc::new(PacedSource::new(source, config.download_delay()?));
    let stats = Arc::new(StatsCollector::new());
    let cache = JsonCache::new(paced, stats.clone());

    let retry = match config.max_attempts {
        Some(max) => RetryPolicy::bounded(config.retry_wait()?, max),
        None => RetryPolicy::unbounded(config.retry_wait()?),
    };

    let crawler = Crawler::new(
        cache,
        retry,
        StorageLayout::new(&config.root_dir),
        Endpoints::new(&config.base_url),
    );

    info!(
        "crawl starting root_dir={} base_url={} delay={}s",
        config.root_dir.display(),
        config.base_url,
        config.download_delay
    );
    crawler
        .crawl(&config.root_locator)
        .await
        .with_context(|| format!("crawl of {} aborted", config.base_url))?;

    let snap = stats.snapshot();
    info!(
        "crawl finished nodes={} fetches={} cache_hits={} written={} bytes={} skipped={} retries={} elapsed={:.1}s",
        snap.nodes_visited,
        snap.fetches,
        snap.cache_hits,
        snap.files_written,
        snap.downloaded_bytes,
        snap.skipped_terminals,
        snap.retries,
        snap.elapsed.as_secs_f64()
    );
    Ok(snap)
}
