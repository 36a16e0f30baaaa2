use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// Where documents come from.
///
/// `fetch` hands back the raw body of whatever the upstream answered. Only
/// transport-level failures are errors; deciding whether a body is a usable
/// document is left to the cache.
#[async_trait]
pub trait ResultSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Bytes>;
}
