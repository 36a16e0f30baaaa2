use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use tracing::{debug, warn};

use super::traits::ResultSource;

/// HTTPS source backed by one pooled `reqwest` client for the whole run.
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let ua = HeaderValue::from_str(user_agent)
            .map_err(|e| anyhow!("invalid user agent {:?}: {}", user_agent, e))?;
        headers.insert(USER_AGENT, ua);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ResultSource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<Bytes> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("GET {} failed: {}", url, e))?;

        let status = resp.status();
        debug!("http fetch status={} url={}", status.as_u16(), url);
        if !status.is_success() {
            // Unpublished results come back as an error page; the body still
            // goes to the caller, which classifies it.
            warn!("http fetch non-success status={} url={}", status.as_u16(), url);
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| anyhow!("reading body of {} failed: {}", url, e))?;
        Ok(body)
    }
}
