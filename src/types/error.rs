use thiserror::Error;

/// symtrack error types
#[derive(Error, Debug)]
pub enum SymtrackError {
    /// Failed to parse or serialize JSON
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Log store operation failed
    #[error("store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// Rejected user input (bad date, etc.)
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for symtrack
pub type Result<T> = std::result::Result<T, SymtrackError>;
