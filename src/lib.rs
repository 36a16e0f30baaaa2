//! Resumable mirror of the election-results tree.
//!
//! The upstream exposes results as JSON documents whose shape is only known
//! once a node's own descriptor has been read. [`engine::crawler::Crawler`]
//! walks that tree depth first and writes every document it finds under a
//! local root. Anything already on disk is reused as is, so an interrupted
//! run picks up where it stopped.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod source;

pub use config::CrawlConfig;
pub use error::{CrawlError, CrawlResult};
