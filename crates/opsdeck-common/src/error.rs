//! Error types shared across the Opsdeck workspace

use thiserror::Error;

/// Result type alias for Opsdeck operations
pub type Result<T> = std::result::Result<T, OpsdeckError>;

/// Main error type for Opsdeck
#[derive(Error, Debug)]
pub enum OpsdeckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl OpsdeckError {
    /// Create a parse error with the offending value and the expected domain
    pub fn parse(kind: &str, value: &str) -> Self {
        Self::Parse(format!("'{}' is not a valid {}", value, kind))
    }
}
