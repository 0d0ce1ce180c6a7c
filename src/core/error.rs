//! Custom error types for Maquette
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Main error type for Maquette operations
#[derive(Error, Debug)]
pub enum MaquetteError {
    /// Chat completion API errors
    #[error("API error: {0}")]
    Api(String),

    /// Requested model is not available on the endpoint
    #[error("Model '{0}' not available on the configured endpoint")]
    ModelNotFound(String),

    /// A single tool call could not be dispatched (bad arguments, etc.)
    #[error("tool '{tool}' dispatch failed: {reason}")]
    ToolDispatch { tool: String, reason: String },

    /// Artifact store errors
    #[error("Artifact error: {0}")]
    Artifact(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for Maquette operations
pub type Result<T> = std::result::Result<T, MaquetteError>;

impl MaquetteError {
    /// Create an API error
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    /// Create an artifact store error
    pub fn artifact(msg: impl Into<String>) -> Self {
        Self::Artifact(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a tool dispatch error for a named tool
    pub fn dispatch(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ToolDispatch {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error is recoverable at the fragment level
    /// (the turn loop records it and keeps going)
    pub fn is_dispatch_failure(&self) -> bool {
        matches!(self, Self::ToolDispatch { .. })
    }
}
