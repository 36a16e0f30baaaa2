// Retry policy for documents the crawl cannot proceed without.

use std::future::Future;
use std::time::Duration;

use tracing::info;

use super::stats::StatsCollector;
use crate::error::{CrawlError, CrawlResult};

/// Fixed-wait retry on [`CrawlError::NotYetAvailable`]; every other error passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub wait: Duration,
    /// Total attempts allowed, `None` for no limit.
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            wait: Duration::from_secs(1),
            max_attempts: None,
        }
    }
}

impl RetryPolicy {
    pub fn unbounded(wait: Duration) -> Self {
        Self {
            wait,
            max_attempts: None,
        }
    }

    pub fn bounded(wait: Duration, max_attempts: u32) -> Self {
        Self {
            wait,
            max_attempts: Some(max_attempts.max(1)),
        }
    }

    /// Call `attempt` until it succeeds, fails for good, or the attempt budget runs out.
    pub async fn run<T, F, Fut>(
        &self,
        label: &str,
        stats: &StatsCollector,
        mut attempt: F,
    ) -> CrawlResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = CrawlResult<T>>,
    {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            match attempt().await {
                Err(e) if e.is_recoverable() => {
                    if let Some(max) = self.max_attempts {
                        if attempts >= max {
                            return Err(CrawlError::RetriesExhausted {
                                label: label.to_string(),
                                attempts,
                            });
                        }
                    }
                    info!("{} not available (attempt {}), sleeping before retrying", label, attempts);
                    stats.record_retry();
                    tokio::time::sleep(self.wait).await;
                }
                other => return other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::path::PathBuf;

    use super::*;

    fn unavailable() -> CrawlError {
        CrawlError::NotYetAvailable { url: "u".into() }
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let stats = StatsCollector::new();
        let calls = Cell::new(0u32);
        let policy = RetryPolicy::unbounded(Duration::from_millis(1));

        let out = policy
            .run("doc", &stats, || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move {
                    if n < 4 {
                        Err(unavailable())
                    } else {
                        Ok(n)
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(out, 4);
        assert_eq!(stats.snapshot().retries, 3);
    }

    #[tokio::test]
    async fn test_fatal_error_is_not_retried() {
        let stats = StatsCollector::new();
        let calls = Cell::new(0u32);
        let policy = RetryPolicy::unbounded(Duration::from_millis(1));

        let err = policy
            .run("doc", &stats, || {
                calls.set(calls.get() + 1);
                async {
                    Err::<(), _>(CrawlError::Corrupt {
                        path: PathBuf::from("x.json"),
                        source: serde_json::from_str::<serde_json::Value>("nope").unwrap_err(),
                    })
                }
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CrawlError::Corrupt { .. }));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_bounded_policy_gives_up() {
        let stats = StatsCollector::new();
        let calls = Cell::new(0u32);
        let policy = RetryPolicy::bounded(Duration::from_millis(1), 3);

        let err = policy
            .run("contest 7", &stats, || {
                calls.set(calls.get() + 1);
                async { Err::<(), _>(unavailable()) }
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CrawlError::RetriesExhausted { attempts: 3, .. }));
        assert_eq!(calls.get(), 3);
    }
}
