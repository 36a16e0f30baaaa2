// Crawl statistics: fetches, cache hits, skips and retries over one run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

struct StatsSample {
    at: Instant,
    fetches: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsSnapshot {
    pub nodes_visited: u64,
    pub fetches: u64,
    pub cache_hits: u64,
    pub files_written: u64,
    pub downloaded_bytes: u64,
    pub unavailable: u64,
    pub retries: u64,
    pub skipped_terminals: u64,
    pub elapsed: Duration,
    /// Fetches per second since the previous snapshot.
    pub fetch_rate: f64,
}

pub struct StatsCollector {
    nodes_visited: AtomicU64,
    fetches: AtomicU64,
    cache_hits: AtomicU64,
    files_written: AtomicU64,
    downloaded_bytes: AtomicU64,
    unavailable: AtomicU64,
    retries: AtomicU64,
    skipped_terminals: AtomicU64,
    started: Instant,
    last_sample: Mutex<StatsSample>,
}

impl StatsCollector {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            nodes_visited: AtomicU64::new(0),
            fetches: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            files_written: AtomicU64::new(0),
            downloaded_bytes: AtomicU64::new(0),
            unavailable: AtomicU64::new(0),
            retries: AtomicU64::new(0),
            skipped_terminals: AtomicU64::new(0),
            started: now,
            last_sample: Mutex::new(StatsSample { at: now, fetches: 0 }),
        }
    }

    pub fn record_node(&self) {
        self.nodes_visited.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch(&self, bytes: u64) {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        self.downloaded_bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_written(&self) {
        self.files_written.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unavailable(&self) {
        self.unavailable.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_retry(&self) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.skipped_terminals.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let now = Instant::now();
        let fetches = self.fetches.load(Ordering::Relaxed);

        let fetch_rate = {
            let mut sample = self.last_sample.lock();
            let elapsed = now.duration_since(sample.at).as_secs_f64();
            let rate = if elapsed > 0.1 {
                (fetches - sample.fetches) as f64 / elapsed
            } else {
                0.0
            };
            sample.at = now;
            sample.fetches = fetches;
            rate
        };

        StatsSnapshot {
            nodes_visited: self.nodes_visited.load(Ordering::Relaxed),
            fetches,
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            files_written: self.files_written.load(Ordering::Relaxed),
            downloaded_bytes: self.downloaded_bytes.load(Ordering::Relaxed),
            unavailable: self.unavailable.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            skipped_terminals: self.skipped_terminals.load(Ordering::Relaxed),
            elapsed: now.duration_since(self.started),
            fetch_rate,
        }
    }
}

impl Default for StatsCollector {
    fn default() -> Self {
        Self::new()
    }
}
