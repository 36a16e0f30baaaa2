use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Mutex;

use super::traits::ResultSource;

/// Decorator that waits `delay` after every fetch, whether it succeeded or not.
///
/// The lock is held across fetch and delay, so the delay is one budget shared
/// by every caller of this source rather than a per-caller pause.
pub struct PacedSource {
    inner: Arc<dyn ResultSource>,
    delay: Duration,
    gate: Mutex<()>,
}

impl PacedSource {
    pub fn new(inner: Arc<dyn ResultSource>, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            gate: Mutex::new(()),
        }
    }
}

#[async_trait]
impl ResultSource for PacedSource {
    async fn fetch(&self, url: &str) -> Result<Bytes> {
        let _gate = self.gate.lock().await;
        let result = self.inner.fetch(url).await;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Instant;

    use anyhow::anyhow;

    use super::*;

    struct Flaky {
        calls: AtomicU32,
    }

    #[async_trait]
    impl ResultSource for Flaky {
        async fn fetch(&self, _url: &str) -> Result<Bytes> {
            if self.calls.fetch_add(1, Ordering::Relaxed) % 2 == 0 {
                Ok(Bytes::from_static(b"{}"))
            } else {
                Err(anyhow!("connection reset"))
            }
        }
    }

    #[tokio::test]
    async fn test_delay_applies_after_success_and_failure() {
        let inner = Arc::new(Flaky {
            calls: AtomicU32::new(0),
        });
        let paced = PacedSource::new(inner.clone(), Duration::from_millis(40));

        let t0 = Instant::now();
        assert!(paced.fetch("a").await.is_ok());
        assert!(paced.fetch("b").await.is_err());
        assert!(t0.elapsed() >= Duration::from_millis(80));
        assert_eq!(inner.calls.load(Ordering::Relaxed), 2);
    }
}
