//! RSS scraper tool
//!
//! Fetches raw XML from a list of feed URLs. Any failing URL fails the whole
//! call.

use crate::feed::FeedFetcher;
use crate::tools::{Tool, ToolDescription, ToolError};
use async_trait::async_trait;
use serde_json::{json, Value};

/// RSS scraper tool - builtin implementation
#[derive(Default)]
pub struct RssScraperTool {
    fetcher: Option<FeedFetcher>,
}

impl RssScraperTool {
    pub fn new() -> Self {
        Self { fetcher: None }
    }

    /// Extract the URL list from parameters (pure function)
    fn parse_urls(parameters: &Value) -> Result<Vec<String>, ToolError> {
        let urls = parameters
            .get("urls")
            .and_then(|v| v.as_array())
            .ok_or_else(|| ToolError::ExecutionError("'urls' must be an array".to_string()))?;

        urls.iter()
            .map(|url| {
                url.as_str().map(str::to_string).ok_or_else(|| {
                    ToolError::ExecutionError("'urls' entries must be strings".to_string())
                })
            })
            .collect()
    }
}

#[async_trait]
impl Tool for RssScraperTool {
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: "rss_scraper".to_string(),
            description: "Fetches raw XML data from provided RSS feed URLs and returns it."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "urls": {
                        "type": "array",
                        "description": "List of RSS feed URLs.",
                        "items": {
                            "type": "string"
                        }
                    }
                },
                "required": ["urls"],
                "additionalProperties": false
            }),
        }
    }

    async fn initialize(&mut self, _config: Option<&Value>) -> Result<(), ToolError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ToolError::InitializationError(e.to_string()))?;
        self.fetcher = Some(FeedFetcher::with_client(client));
        Ok(())
    }

    async fn execute(&self, parameters: &Value) -> Result<Value, ToolError> {
        let fetcher = self
            .fetcher
            .as_ref()
            .ok_or_else(|| ToolError::ExecutionError("Tool not initialized".to_string()))?;

        let urls = Self::parse_urls(parameters)?;

        let results = fetcher
            .fetch_all(&urls)
            .await
            .map_err(|e| ToolError::ExecutionError(e.to_string()))?;

        serde_json::to_value(results).map_err(|e| ToolError::ExecutionError(e.to_string()))
    }

    async fn shutdown(&mut self) -> Result<(), ToolError> {
        self.fetcher = None;
        Ok(())
    }
}
