//! Error types for the server.

use thiserror::Error;

/// Server-specific errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The request body could not be read.
    #[error("failed to read request body: {0}")]
    Body(String),

    /// The request body was larger than the configured limit.
    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// A field event was not valid JSON or named an unknown field.
    #[error("invalid field event: {0}")]
    InvalidEvent(#[from] serde_json::Error),

    /// Socket error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The HTTP client could not be set up.
    #[error(transparent)]
    Client(#[from] enrol_client::ClientError),
}

/// Result type alias for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;
