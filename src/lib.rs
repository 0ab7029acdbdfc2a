//! Crime ETL tools
//!
//! Two tool adapters for an agent orchestrator:
//!
//! - `rss_scraper` fetches raw RSS/XML bodies, one GET per URL, in order.
//! - `postgres_loader` inserts crime article records into `crime_articles`
//!   inside a single transaction.
//!
//! # Quick Start
//!
//! ```rust
//! use crime_etl_tools::loader::ArticleRecord;
//! use serde_json::json;
//!
//! let record: ArticleRecord = serde_json::from_value(json!({
//!     "title": "Warehouse break-in",
//!     "additional_links": ["https://example.com/a", "https://example.com/b"]
//! }))
//! .unwrap();
//!
//! assert_eq!(record.title.as_deref(), Some("Warehouse break-in"));
//! assert!(record.image_url.is_none());
//! assert_eq!(
//!     record.additional_links.as_deref(),
//!     Some(r#"{"https://example.com/a","https://example.com/b"}"#)
//! );
//! ```

pub mod config;
pub mod error;
pub mod feed;
pub mod loader;
pub mod observability;
pub mod testing;
pub mod tools;

pub use config::*;
pub use error::{ErrorKind, EtlError, EtlResult};
pub use feed::{FeedFetcher, FeedResult, FetchError};
pub use loader::{ArticleRecord, ArticleStore, LoadError, LoadSummary, RecordLoader};
pub use tools::{Tool, ToolDescription, ToolError, ToolSystem};
