// Entry points shared by the binary and embedders.

pub mod crawl_api;
pub mod simple;
