use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::Deserialize;

/// Upstream data root of the 2022 national election results site.
pub const DEFAULT_BASE_URL: &str = "https://2022electionresults.comelec.gov.ph/data";

/// Local directory everything is mirrored under.
pub const DEFAULT_ROOT_DIR: &str = "data";

/// Locator of the tree's root descriptor, relative to `<base>/regions`.
pub const ROOT_LOCATOR: &str = "root.json";

/// Minimum pause after each download, in seconds.
pub const DEFAULT_DOWNLOAD_DELAY_SECS: f64 = 0.5;

/// Pause between attempts on a document that is not published yet, in seconds.
pub const DEFAULT_RETRY_WAIT_SECS: f64 = 1.0;

/// Per-request timeout, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: f64 = 30.0;

/// The upstream serves browsers; look like one.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/101.0.4951.54 Safari/537.36";

/// Classification of the lowest administrative level; its results are election returns.
pub const LEAF_CLASSIFICATION: &str = "Barangay";

/// Classification of the tree's top node; the only non-leaf allowed several certificates.
pub const TOP_CLASSIFICATION: &str = "Country";

/// Top-level configuration for a crawl run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Directory the mirror is written to.
    pub root_dir: PathBuf,
    /// Seconds to wait after every network fetch.
    pub download_delay: f64,
    /// Upstream data root, without trailing slash.
    pub base_url: String,
    /// Locator of the root descriptor.
    pub root_locator: String,
    /// Seconds between retries of an unpublished descriptor or contest.
    pub retry_wait: f64,
    /// Total attempts per descriptor or contest, the first one included.
    /// `None` retries forever.
    pub max_attempts: Option<u32>,
    pub user_agent: String,
    pub request_timeout: f64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from(DEFAULT_ROOT_DIR),
            download_delay: DEFAULT_DOWNLOAD_DELAY_SECS,
            base_url: DEFAULT_BASE_URL.to_string(),
            root_locator: ROOT_LOCATOR.to_string(),
            retry_wait: DEFAULT_RETRY_WAIT_SECS,
            max_attempts: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl CrawlConfig {
    pub fn validate(&self) -> Result<()> {
        secs("download_delay", self.download_delay)?;
        secs("retry_wait", self.retry_wait)?;
        let timeout = secs("request_timeout", self.request_timeout)?;
        if timeout.is_zero() {
            return Err(anyhow!("request_timeout must be > 0"));
        }
        if self.base_url.trim().is_empty() {
            return Err(anyhow!("base_url must not be empty"));
        }
        if self.root_locator.trim().is_empty() {
            return Err(anyhow!("root_locator must not be empty"));
        }
        if self.max_attempts == Some(0) {
            return Err(anyhow!("max_attempts must be at least 1"));
        }
        Ok(())
    }

    pub fn download_delay(&self) -> Result<Duration> {
        secs("download_delay", self.download_delay)
    }

    pub fn retry_wait(&self) -> Result<Duration> {
        secs("retry_wait", self.retry_wait)
    }

    pub fn request_timeout(&self) -> Result<Duration> {
        secs("request_timeout", self.request_timeout)
    }
}

fn secs(name: &str, value: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(value)
        .map_err(|_| anyhow!("{} must be a finite, non-negative number of seconds (got {})", name, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = CrawlConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.download_delay().unwrap(), Duration::from_millis(500));
        assert_eq!(cfg.retry_wait().unwrap(), Duration::from_secs(1));
        assert_eq!(cfg.root_dir, PathBuf::from("data"));
        assert!(cfg.max_attempts.is_none());
    }

    #[test]
    fn test_rejects_negative_and_nan_delays() {
        let mut cfg = CrawlConfig::default();
        cfg.download_delay = -0.1;
        assert!(cfg.validate().is_err());

        cfg.download_delay = f64::NAN;
        assert!(cfg.validate().is_err());

        cfg.download_delay = 0.0;
        cfg.request_timeout = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg: CrawlConfig =
            serde_json::from_str(r#"{"root_dir": "mirror", "download_delay": 0.25}"#).unwrap();
        assert_eq!(cfg.root_dir, PathBuf::from("mirror"));
        assert_eq!(cfg.download_delay().unwrap(), Duration::from_millis(250));
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_max_attempts_counts_the_first_try() {
        let cfg: CrawlConfig = serde_json::from_str(r#"{"max_attempts": 1}"#).unwrap();
        assert_eq!(cfg.max_attempts, Some(1));
        cfg.validate().unwrap();

        let zero = CrawlConfig {
            max_attempts: Some(0),
            ..CrawlConfig::default()
        };
        assert!(zero.validate().is_err());
    }
}
