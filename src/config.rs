//! Configuration system for the crime ETL tools
//!
//! Loads a TOML file describing the service identity, the database target and
//! the tools to register. Environment variables named here are resolved at
//! call time, never at load time.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Default environment variable holding the PostgreSQL connection string
pub const DEFAULT_DATABASE_URL_ENV: &str = "POSTGRES_DB_URL";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EtlConfig {
    #[serde(default)]
    pub service: ServiceSection,
    #[serde(default)]
    pub database: DatabaseSection,
    #[serde(default)]
    pub tools: HashMap<String, ToolConfig>,
}

/// Service identity section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceSection {
    /// Service identifier (must match [a-zA-Z0-9._-]+)
    pub id: String,
    /// Description of what this deployment does
    #[serde(default)]
    pub description: String,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            id: "crime-etl".to_string(),
            description: "Crime news ETL tools".to_string(),
        }
    }
}

/// Database section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseSection {
    /// Environment variable containing the connection string
    #[serde(default = "default_database_url_env")]
    pub url_env: String,
}

fn default_database_url_env() -> String {
    DEFAULT_DATABASE_URL_ENV.to_string()
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url_env: default_database_url_env(),
        }
    }
}

impl DatabaseSection {
    /// Read the connection string from the environment at call time.
    ///
    /// An unset or blank variable is `EnvVarNotFound`.
    pub fn resolve_url(&self) -> Result<String, ConfigError> {
        std::env::var(&self.url_env)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ConfigError::EnvVarNotFound(self.url_env.clone()))
    }
}

/// Tool configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ToolConfig {
    /// Simple form: tool_name = "identifier"
    Simple(String),
    /// Complex form: tool_name = { impl = "identifier", config = { ... } }
    Complex {
        #[serde(rename = "impl")]
        implementation: String,
        #[serde(default)]
        config: HashMap<String, serde_json::Value>,
    },
}

impl ToolConfig {
    /// Implementation identifier, e.g. "builtin"
    pub fn implementation(&self) -> &str {
        match self {
            ToolConfig::Simple(implementation) => implementation,
            ToolConfig::Complex { implementation, .. } => implementation,
        }
    }

    /// Per-tool configuration handed to `Tool::initialize`
    pub fn config_value(&self) -> Option<serde_json::Value> {
        match self {
            ToolConfig::Simple(_) => None,
            ToolConfig::Complex { config, .. } => Some(serde_json::Value::Object(
                config.clone().into_iter().collect(),
            )),
        }
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),
    #[error("Invalid service ID format: {0}")]
    InvalidServiceId(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Default for EtlConfig {
    fn default() -> Self {
        let mut tools = HashMap::new();
        tools.insert(
            "rss_scraper".to_string(),
            ToolConfig::Simple("builtin".to_string()),
        );
        tools.insert(
            "postgres_loader".to_string(),
            ToolConfig::Simple("builtin".to_string()),
        );

        Self {
            service: ServiceSection::default(),
            database: DatabaseSection::default(),
            tools,
        }
    }
}

impl EtlConfig {
    /// Load configuration from TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EtlConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check field formats that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_service_id(&self.service.id)?;

        if self.database.url_env.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "[database] url_env must name an environment variable".to_string(),
            ));
        }

        Ok(())
    }
}

/// Validate service ID format
fn validate_service_id(service_id: &str) -> Result<(), ConfigError> {
    let valid_chars = service_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-');

    if service_id.is_empty() || !valid_chars {
        return Err(ConfigError::InvalidServiceId(format!(
            "Service ID '{service_id}' must match pattern [a-zA-Z0-9._-]+"
        )));
    }

    Ok(())
}
