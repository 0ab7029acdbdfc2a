//! Observability for the ETL tools: structured logging via `tracing`.

pub mod logging;

pub use logging::{init_default_logging, init_logging, LogFormat};

// Span macros for structured logging
pub use logging::tool_span;
