//! Builtin tools
//!
//! Each tool is a thin adapter: parameter parsing and result shaping live
//! here, the I/O lives in `crate::feed` and `crate::loader`.

pub mod postgres_loader;
pub mod rss_scraper;

pub use postgres_loader::PostgresLoaderTool;
pub use rss_scraper::RssScraperTool;
