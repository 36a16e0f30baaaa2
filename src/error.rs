use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while mirroring the tree.
///
/// Only [`CrawlError::NotYetAvailable`] is recoverable. Every other variant
/// ends the run.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The upstream answered with something that is not JSON, which is how
    /// it reports results that have not been published yet.
    #[error("{url} is not available yet")]
    NotYetAvailable { url: String },

    #[error("cached file {} is corrupt", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected document shape in {what}")]
    Schema {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("integrity violation at {node:?}: {detail}")]
    Integrity { node: String, detail: String },

    #[error("gave up on {label} after {attempts} attempts")]
    RetriesExhausted { label: String, attempts: u32 },

    #[error("fetching {url} failed")]
    Transport {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("storage error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CrawlError {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CrawlError::NotYetAvailable { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CrawlError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type CrawlResult<T> = std::result::Result<T, CrawlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_unavailable_is_recoverable() {
        let unavailable = CrawlError::NotYetAvailable {
            url: "https://x/results/1.json".into(),
        };
        assert!(unavailable.is_recoverable());

        let corrupt = CrawlError::Corrupt {
            path: PathBuf::from("data/results/info.json"),
            source: serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
        };
        assert!(!corrupt.is_recoverable());

        let integrity = CrawlError::Integrity {
            node: "NCR".into(),
            detail: "2 voting boards".into(),
        };
        assert!(!integrity.is_recoverable());
        assert!(integrity.to_string().contains("NCR"));
    }

    #[test]
    fn test_cause_is_printed_once_in_chain() {
        let parse = serde_json::from_str::<serde_json::Value>("{\"can\": \"Bara").unwrap_err();
        let cause = parse.to_string();
        let corrupt = CrawlError::Corrupt {
            path: PathBuf::from("data/results/A/info.json"),
            source: parse,
        };
        assert!(!corrupt.to_string().contains(&cause));

        let chain = format!("{:#}", anyhow::Error::new(corrupt).context("crawl aborted"));
        assert_eq!(chain.matches(&cause).count(), 1, "{}", chain);
    }
}
