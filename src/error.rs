//! Crate-level error type
//!
//! Wraps each module's error and exposes a structured `ErrorKind` so callers
//! can branch without parsing strings.

use crate::config::ConfigError;
use crate::feed::FetchError;
use crate::loader::LoadError;
use crate::tools::ToolError;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

const MAX_ERROR_MESSAGE_LEN: usize = 500;

/// Main error type for ETL tool operations
#[derive(Debug, Error)]
pub enum EtlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Feed fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Article load failed: {0}")]
    Load(#[from] LoadError),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Coarse error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    InvalidInput,
    Network,
    Database,
    Internal,
}

impl EtlError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EtlError::Config(_) => ErrorKind::Configuration,
            EtlError::Tool(e) => match e {
                ToolError::ConfigurationError(_) | ToolError::InitializationError(_) => {
                    ErrorKind::Configuration
                }
                ToolError::ValidationError(_) | ToolError::SchemaError(_) => {
                    ErrorKind::InvalidInput
                }
                ToolError::UnknownTool(_) | ToolError::UnknownImplementation(_) => {
                    ErrorKind::Configuration
                }
                ToolError::ExecutionError(_) | ToolError::ShutdownError(_) => ErrorKind::Internal,
            },
            EtlError::Fetch(FetchError::InvalidUrl { .. }) => ErrorKind::InvalidInput,
            EtlError::Fetch(_) => ErrorKind::Network,
            EtlError::Load(LoadError::Store(_)) | EtlError::Database { .. } => ErrorKind::Database,
            EtlError::InvalidInput { .. } => ErrorKind::InvalidInput,
            EtlError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create database error from a status string the loader already reported
    pub fn database<S: Into<String>>(message: S) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    /// Create internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Sanitized message safe to surface to the orchestrator
    pub fn public_message(&self) -> String {
        sanitize_error_message(&self.to_string())
    }
}

fn secret_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(password|token|key|secret)([=:])\s*[^\s&]+").expect("valid regex")
    })
}

fn userinfo_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"([a-zA-Z][a-zA-Z0-9+.-]*://)[^/@\s]+@").expect("valid regex")
    })
}

/// Redact credentials and truncate long messages
pub fn sanitize_error_message(message: &str) -> String {
    let sanitized = userinfo_pattern().replace_all(message, "${1}***@");
    let mut sanitized = secret_pattern()
        .replace_all(&sanitized, "${1}=***")
        .to_string();

    if sanitized.len() > MAX_ERROR_MESSAGE_LEN {
        let truncate_suffix = "...[truncated]";
        let mut cut = MAX_ERROR_MESSAGE_LEN - truncate_suffix.len();
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
        sanitized.push_str(truncate_suffix);
    }

    sanitized
}

/// Result type for ETL operations
pub type EtlResult<T> = Result<T, EtlError>;
