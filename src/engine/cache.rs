// Load-or-fetch cache: a file on disk is the document, forever.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::stats::StatsCollector;
use crate::error::{CrawlError, CrawlResult};
use crate::source::traits::ResultSource;

/// Resolves one document, from disk when present, from the source otherwise.
///
/// A file that exists is taken as complete and correct and is never
/// refetched. Freshly fetched bodies are written verbatim, and only once they
/// parse as JSON.
pub struct JsonCache {
    source: Arc<dyn ResultSource>,
    stats: Arc<StatsCollector>,
}

impl JsonCache {
    pub fn new(source: Arc<dyn ResultSource>, stats: Arc<StatsCollector>) -> Self {
        Self { source, stats }
    }

    pub fn stats(&self) -> &Arc<StatsCollector> {
        &self.stats
    }

    /// Single attempt. `path` must already be sanitized (see `engine::layout`).
    pub async fn resolve(&self, path: &Path, url: &str) -> CrawlResult<Value> {
        debug!("resolve path={} url={}", path.display(), url);

        if path.exists() {
            info!("{} exists, loading", path.display());
            let doc = load(path)?;
            self.stats.record_cache_hit();
            return Ok(doc);
        }

        info!("{} missing, downloading {}", path.display(), url);
        let body = self
            .source
            .fetch(url)
            .await
            .map_err(|source| CrawlError::Transport {
                url: url.to_string(),
                source,
            })?;
        self.stats.record_fetch(body.len() as u64);

        let doc: Value = match serde_json::from_slice(&body) {
            Ok(doc) => doc,
            Err(e) => {
                info!("{} not available: {}", url, e);
                self.stats.record_unavailable();
                return Err(CrawlError::NotYetAvailable {
                    url: url.to_string(),
                });
            }
        };

        write_atomic(path, &body)?;
        self.stats.record_written();
        debug!("wrote {} ({} bytes)", path.display(), body.len());

        Ok(doc)
    }
}

/// Write `body` to a sibling temp file and rename it over `path`. A killed run
/// leaves either the whole document or nothing at `path`.
fn write_atomic(path: &Path, body: &[u8]) -> CrawlResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| CrawlError::io(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| CrawlError::io(dir, e))?;
    tmp.write_all(body)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| CrawlError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| CrawlError::io(path, e.error))?;
    Ok(())
}

/// Read a persisted document. Failing to parse it is local corruption, never "not yet available".
pub fn load(path: &Path) -> CrawlResult<Value> {
    let raw = fs::read(path).map_err(|e| CrawlError::io(path, e))?;
    serde_json::from_slice(&raw).map_err(|source| CrawlError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}
