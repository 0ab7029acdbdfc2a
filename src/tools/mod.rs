//! Tool system for the agent orchestrator
//!
//! Each tool describes its parameters as JSON Schema. Parameters are validated
//! against that schema before `execute` runs.

use crate::config::EtlConfig;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, Instrument};

pub mod builtin;

/// Tool interface
#[async_trait]
pub trait Tool: Send + Sync {
    /// JSON-serializable description with a JSON Schema for the parameters
    fn describe(&self) -> ToolDescription;

    /// Receives the per-tool configuration block, called once at startup
    async fn initialize(&mut self, config: Option<&Value>) -> Result<(), ToolError>;

    /// Receives parameters already validated against `describe()`
    async fn execute(&self, parameters: &Value) -> Result<Value, ToolError>;

    /// Release resources held by the tool
    async fn shutdown(&mut self) -> Result<(), ToolError> {
        Ok(())
    }
}

/// Tool description
#[derive(Debug, Clone)]
pub struct ToolDescription {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Registry of initialized tools
pub struct ToolSystem {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolSystem {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Initialize every tool named in the `[tools]` section
    pub async fn initialize(&mut self, config: &EtlConfig) -> Result<(), ToolError> {
        for (tool_name, tool_config) in &config.tools {
            let mut tool = match tool_config.implementation() {
                "builtin" => self.create_builtin_tool(tool_name, config)?,
                other => return Err(ToolError::UnknownImplementation(other.to_string())),
            };

            tool.initialize(tool_config.config_value().as_ref()).await?;
            debug!(tool = %tool_name, "Tool initialized");

            self.tools.insert(tool_name.clone(), tool);
        }

        Ok(())
    }

    /// Register an already-initialized tool under its described name
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.describe().name;
        self.tools.insert(name, tool);
    }

    /// Create builtin tool instances
    fn create_builtin_tool(
        &self,
        tool_name: &str,
        config: &EtlConfig,
    ) -> Result<Box<dyn Tool>, ToolError> {
        match tool_name {
            "rss_scraper" => Ok(Box::new(builtin::RssScraperTool::new())),
            "postgres_loader" => Ok(Box::new(builtin::PostgresLoaderTool::new(
                config.database.clone(),
            ))),
            _ => Err(ToolError::UnknownTool(tool_name.to_string())),
        }
    }

    /// Get tool description
    pub fn describe_tool(&self, tool_name: &str) -> Option<ToolDescription> {
        self.tools.get(tool_name).map(|tool| tool.describe())
    }

    /// Execute tool with validated parameters
    pub async fn execute_tool(
        &self,
        tool_name: &str,
        parameters: &Value,
    ) -> Result<Value, ToolError> {
        let tool = self
            .tools
            .get(tool_name)
            .ok_or_else(|| ToolError::UnknownTool(tool_name.to_string()))?;

        Self::validate_parameters(tool.as_ref(), parameters)?;

        tool.execute(parameters)
            .instrument(crate::tool_span!(tool = %tool_name))
            .await
    }

    /// Validate parameters against the tool's schema
    fn validate_parameters(tool: &dyn Tool, parameters: &Value) -> Result<(), ToolError> {
        let description = tool.describe();
        let validator = jsonschema::validator_for(&description.parameters)
            .map_err(|e| ToolError::SchemaError(format!("Schema compilation error: {e}")))?;

        let error_messages: Vec<String> = validator
            .iter_errors(parameters)
            .map(|e| format!("At '{}': {}", e.instance_path, e))
            .collect();
        if error_messages.is_empty() {
            Ok(())
        } else {
            Err(ToolError::ValidationError(error_messages.join("; ")))
        }
    }

    /// Get list of available tools
    pub fn list_tools(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Shutdown all tools
    pub async fn shutdown(&mut self) -> Result<(), ToolError> {
        for tool in self.tools.values_mut() {
            tool.shutdown().await?;
        }
        Ok(())
    }
}

impl Default for ToolSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Tool system errors
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Unknown tool implementation: {0}")]
    UnknownImplementation(String),
    #[error("Tool initialization failed: {0}")]
    InitializationError(String),
    #[error("Tool configuration error: {0}")]
    ConfigurationError(String),
    #[error("Parameter validation failed: {0}")]
    ValidationError(String),
    #[error("Schema error: {0}")]
    SchemaError(String),
    #[error("Tool execution failed: {0}")]
    ExecutionError(String),
    #[error("Tool shutdown failed: {0}")]
    ShutdownError(String),
}
