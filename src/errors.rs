//! Error types for logger construction

use thiserror::Error;

/// Result type alias for the logger crate
pub type Result<T> = std::result::Result<T, LoggerError>;

/// Main error type for logger construction
#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Invalid LOG_LEVEL {value}, expected any of {expected}")]
    InvalidLevel { value: String, expected: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Logger already installed: {0}")]
    Install(#[from] log::SetLoggerError),
}

impl LoggerError {
    /// Build the error raised for a level string outside the known set
    pub fn invalid_level(value: impl Into<String>) -> Self {
        Self::InvalidLevel {
            value: value.into(),
            expected: crate::severity::Severity::ALL
                .iter()
                .map(|s| s.name())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}
