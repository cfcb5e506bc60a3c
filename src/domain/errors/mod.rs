// Domain errors - Error types for the domain layer

use thiserror::Error;

/// Domain-specific error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    #[error("Bad arguments: {0}")]
    BadArgs(String),

    /// URL is not a recognisable YouTube link
    #[error("Invalid YouTube URL: {0}")]
    InvalidUrl(String),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// External binary could not be started
    #[error("Required tool not available: {0}")]
    ToolMissing(String),

    /// External binary exited non-zero
    #[error("{tool} failed: {message}")]
    ToolFailed { tool: String, message: String },

    /// Tool output could not be understood
    #[error("Parse error: {0}")]
    ParseError(String),

    /// File system operation failed
    #[error("File system error: {0}")]
    FsFail(String),

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    /// Every clip of a split failed
    #[error("No clips were produced from {0}")]
    NoClips(String),
}

impl DomainError {
    /// Build a `ToolFailed` from the tool name and its stderr
    pub fn tool_failed(tool: &str, stderr: &str) -> Self {
        let message = stderr
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("exited with non-zero status")
            .to_string();
        DomainError::ToolFailed {
            tool: tool.to_string(),
            message,
        }
    }

    /// Whether the error was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(self, DomainError::BadArgs(_) | DomainError::InvalidUrl(_))
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::FsFail(err.to_string())
    }
}
