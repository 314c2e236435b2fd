//! Error Handling Infrastructure
//!
//! This module defines all error types used throughout Roster.
//! Every fallible operation returns a [`RosterError`], which the interaction
//! loop inspects to decide whether to keep going or shut down.
//!
//! # Error Categories
//! - `ConnectionFailed`: Database connection errors (fatal at startup)
//! - `QueryFailed`: Query execution or row decoding errors
//! - `InvalidInput`: Missing parameters or nothing to choose from
//! - `EngineError`: Engine-specific database errors
//! - `ConfigError`: Configuration file or environment errors
//! - `PromptFailed`: The terminal prompt could not be shown or answered
//! - `InputClosed`: The input stream is gone; treated as a quit request
//! - `Output`: Writing to the terminal failed

use thiserror::Error;

/// Main error type for Roster operations
#[derive(Error, Debug)]
pub enum RosterError {
    /// Database connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    /// Invalid input or missing required parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Engine-specific database error
    #[error("Engine error ({engine}): {detail}")]
    EngineError { engine: String, detail: String },

    /// Configuration error (file not found, invalid JSON, etc.)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Prompt could not be displayed or read
    #[error("Prompt failed: {0}")]
    PromptFailed(String),

    /// Input stream closed (EOF, no terminal, interrupted)
    #[error("Input closed")]
    InputClosed,

    /// Writing output failed
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

impl RosterError {
    /// Convert error to error code string for logs and JSON output
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ConnectionFailed(_) => "CONNECTION_FAILED",
            Self::QueryFailed(_) => "QUERY_FAILED",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::EngineError { .. } => "ENGINE_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::PromptFailed(_) => "PROMPT_FAILED",
            Self::InputClosed => "INPUT_CLOSED",
            Self::Output(_) => "OUTPUT_ERROR",
        }
    }

    /// Get human-readable error message
    ///
    /// Never contains the connection password.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Create a connection failed error
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::ConnectionFailed(message.into())
    }

    /// Create a query failed error
    pub fn query_failed(message: impl Into<String>) -> Self {
        Self::QueryFailed(message.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create an engine-specific error
    pub fn engine_error(engine: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::EngineError { engine: engine.into(), detail: detail.into() }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Create a prompt failed error
    pub fn prompt_failed(message: impl Into<String>) -> Self {
        Self::PromptFailed(message.into())
    }
}

/// Result type alias for Roster operations
pub type Result<T> = std::result::Result<T, RosterError>;
