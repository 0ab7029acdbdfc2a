//! Mock implementations for testing
//!
//! `MockArticleStore` mimics the transactional behavior of the PostgreSQL
//! store: rows become visible only after commit, and a failing insert discards
//! the whole batch.

use crate::loader::{ArticleRecord, ArticleStore, StoreError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-memory article store with failure injection
#[derive(Debug, Default)]
pub struct MockArticleStore {
    rows: Mutex<Vec<ArticleRecord>>,
    urls_seen: Mutex<Vec<String>>,
    connections: AtomicUsize,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
    fail_at: Option<(usize, String)>,
    refuse_connection: Option<String>,
}

impl MockArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the insert at `index` (zero-based) of every batch with `message`
    pub fn failing_at<M: Into<String>>(index: usize, message: M) -> Self {
        Self {
            fail_at: Some((index, message.into())),
            ..Default::default()
        }
    }

    /// Fail every connection attempt with `message`
    pub fn refusing_connections<M: Into<String>>(message: M) -> Self {
        Self {
            refuse_connection: Some(message.into()),
            ..Default::default()
        }
    }

    /// Committed rows, in insertion order
    pub fn rows(&self) -> Vec<ArticleRecord> {
        self.rows.lock().map(|rows| rows.clone()).unwrap_or_default()
    }

    /// Database URLs passed to each connection attempt
    pub fn urls_seen(&self) -> Vec<String> {
        self.urls_seen
            .lock()
            .map(|urls| urls.clone())
            .unwrap_or_default()
    }

    pub fn connections_opened(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn rollbacks(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArticleStore for MockArticleStore {
    async fn insert_batch(
        &self,
        database_url: &str,
        articles: &[ArticleRecord],
    ) -> Result<u64, StoreError> {
        if let Ok(mut urls) = self.urls_seen.lock() {
            urls.push(database_url.to_string());
        }

        if let Some(message) = &self.refuse_connection {
            return Err(StoreError::Backend(message.clone()));
        }
        self.connections.fetch_add(1, Ordering::SeqCst);

        let mut staged = Vec::with_capacity(articles.len());
        for (index, article) in articles.iter().enumerate() {
            if let Some((fail_index, message)) = &self.fail_at {
                if *fail_index == index {
                    self.rollbacks.fetch_add(1, Ordering::SeqCst);
                    return Err(StoreError::Backend(message.clone()));
                }
            }
            staged.push(article.clone());
        }

        self.rows
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .extend(staged);
        self.commits.fetch_add(1, Ordering::SeqCst);

        Ok(articles.len() as u64)
    }
}
