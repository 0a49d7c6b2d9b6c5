//! Error types for the remote collaborators.

use thiserror::Error;

/// Errors from talking to the department and user endpoints.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Building the client or performing the request failed.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("{url} answered {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// The response body was not the expected JSON.
    #[error("invalid JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The department document had an unexpected shape.
    #[error(transparent)]
    Form(#[from] enrol_forms::FormError),
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
