//! PostgreSQL loader tool
//!
//! Inserts crime article objects into `crime_articles`. A missing connection
//! string is a hard error; database failures roll back the batch and come
//! back as an `Error inserting articles: ...` status string.

use crate::config::{ConfigError, DatabaseSection};
use crate::loader::{ArticleRecord, ArticleStore, PgArticleStore, RecordLoader};
use crate::tools::{Tool, ToolDescription, ToolError};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

/// PostgreSQL loader tool - builtin implementation
pub struct PostgresLoaderTool<S: ArticleStore = PgArticleStore> {
    database: DatabaseSection,
    store: Arc<S>,
}

impl PostgresLoaderTool<PgArticleStore> {
    pub fn new(database: DatabaseSection) -> Self {
        Self::with_store(database, Arc::new(PgArticleStore::new()))
    }
}

impl<S: ArticleStore> PostgresLoaderTool<S> {
    pub fn with_store(database: DatabaseSection, store: Arc<S>) -> Self {
        Self { database, store }
    }

    pub fn url_env(&self) -> &str {
        &self.database.url_env
    }

    /// Extract the article list from parameters (pure function)
    fn parse_articles(parameters: &Value) -> Result<Vec<ArticleRecord>, ToolError> {
        let articles = parameters
            .get("articles")
            .cloned()
            .ok_or_else(|| ToolError::ExecutionError("'articles' is required".to_string()))?;

        serde_json::from_value(articles)
            .map_err(|e| ToolError::ExecutionError(format!("Invalid articles: {e}")))
    }
}

#[async_trait]
impl<S: ArticleStore + 'static> Tool for PostgresLoaderTool<S> {
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: "postgres_loader".to_string(),
            description:
                "Loads structured crime article JSON objects into a PostgreSQL database."
                    .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "articles": {
                        "type": "array",
                        "description": "List of structured article JSON objects.",
                        "items": {
                            "type": "object"
                        }
                    }
                },
                "required": ["articles"],
                "additionalProperties": false
            }),
        }
    }

    async fn initialize(&mut self, config: Option<&Value>) -> Result<(), ToolError> {
        if let Some(config) = config {
            if let Some(url_env) = config.get("url_env") {
                let url_env = url_env.as_str().filter(|s| !s.trim().is_empty()).ok_or_else(
                    || ToolError::InitializationError("url_env must be a non-empty string".into()),
                )?;
                self.database.url_env = url_env.to_string();
            }
        }
        Ok(())
    }

    async fn execute(&self, parameters: &Value) -> Result<Value, ToolError> {
        let articles = Self::parse_articles(parameters)?;

        // Resolved per call so a changed environment takes effect immediately
        let loader = RecordLoader::from_config(Arc::clone(&self.store), &self.database)
            .map_err(|e| match e {
                ConfigError::EnvVarNotFound(url_env) => ToolError::ConfigurationError(format!(
                    "{url_env} environment variable not set."
                )),
                other => ToolError::ConfigurationError(other.to_string()),
            })?;

        match loader.load(&articles).await {
            Ok(summary) => Ok(Value::String(summary.to_string())),
            Err(e) => Ok(Value::String(e.to_status())),
        }
    }
}
