//! Error types for the Cupid backend client.

use cupid_core::CupidError;
use thiserror::Error;

/// Errors that can occur when talking to the Cupid backend.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Invalid backend URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse backend response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// File not found for upload
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// IO error while reading an upload
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

impl From<ClientError> for CupidError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Request(_) | ClientError::ServerUnreachable(_) => {
                CupidError::network(err.to_string())
            }
            ClientError::ParseError(msg) => CupidError::UnexpectedResponse(msg),
            ClientError::InvalidUrl(msg) => CupidError::invalid_input(msg),
            other => CupidError::Other(other.to_string()),
        }
    }
}
