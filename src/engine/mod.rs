// Crawl engine: storage layout, load-or-fetch cache, retry policy and the tree walk.

pub mod cache;
pub mod crawler;
pub mod layout;
pub mod retry;
pub mod stats;
