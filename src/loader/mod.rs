//! Crime article loading
//!
//! `RecordLoader` resolves the database URL before touching the network, then
//! hands the whole batch to an `ArticleStore`, which inserts it inside one transaction.
//! A batch is all-or-nothing: any failing insert rolls back every row.

use crate::config::{ConfigError, DatabaseSection};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;
use tracing::{info, warn};

pub mod postgres;
pub mod record;

pub use postgres::PgArticleStore;
pub use record::{ArticleRecord, ARTICLE_COLUMNS};

/// Fixed target table
pub const ARTICLE_TABLE: &str = "crime_articles";

/// Prefix of every failure status string
pub const LOAD_ERROR_PREFIX: &str = "Error inserting articles: ";

/// Storage backend errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    Backend(String),
}

/// Transactional sink for article batches
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Insert every article on a single connection inside a single transaction.
    ///
    /// Must commit exactly once on success and roll back on any error. The
    /// connection is released before returning on every path.
    async fn insert_batch(
        &self,
        database_url: &str,
        articles: &[ArticleRecord],
    ) -> Result<u64, StoreError>;
}

#[async_trait]
impl<S: ArticleStore + ?Sized> ArticleStore for std::sync::Arc<S> {
    async fn insert_batch(
        &self,
        database_url: &str,
        articles: &[ArticleRecord],
    ) -> Result<u64, StoreError> {
        (**self).insert_batch(database_url, articles).await
    }
}

/// Successful load summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub inserted: u64,
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Inserted {} articles into PostgreSQL.", self.inserted)
    }
}

/// Loader errors
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{0}")]
    Store(#[from] StoreError),
}

impl LoadError {
    /// Status string reported to the orchestrator for a rolled-back batch
    pub fn to_status(&self) -> String {
        format!(
            "{LOAD_ERROR_PREFIX}{}",
            crate::error::sanitize_error_message(&self.to_string())
        )
    }
}

/// Loads article batches into `crime_articles`
pub struct RecordLoader<S: ArticleStore> {
    store: S,
    database_url: String,
}

impl<S: ArticleStore> RecordLoader<S> {
    pub fn new<U: Into<String>>(store: S, database_url: U) -> Self {
        Self {
            store,
            database_url: database_url.into(),
        }
    }

    /// Resolve the connection string from the environment now.
    ///
    /// An unset variable fails here, before any connection is attempted.
    pub fn from_config(store: S, database: &DatabaseSection) -> Result<Self, ConfigError> {
        Ok(Self::new(store, database.resolve_url()?))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Insert the batch, returning the inserted count
    pub async fn load(&self, articles: &[ArticleRecord]) -> Result<LoadSummary, LoadError> {
        match self.store.insert_batch(&self.database_url, articles).await {
            Ok(inserted) => {
                info!(inserted, table = ARTICLE_TABLE, "Article batch committed");
                Ok(LoadSummary { inserted })
            }
            Err(e) => {
                warn!(
                    batch = articles.len(),
                    error = %crate::error::sanitize_error_message(&e.to_string()),
                    "Article batch rolled back"
                );
                Err(LoadError::Store(e))
            }
        }
    }
}
