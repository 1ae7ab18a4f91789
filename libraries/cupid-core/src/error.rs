/// Core error types for Cupid
use thiserror::Error;

/// Result type alias using `CupidError`
pub type Result<T> = std::result::Result<T, CupidError>;

/// Core error type shared by collaborator implementations
#[derive(Error, Debug)]
pub enum CupidError {
    /// Network or transport failure talking to an external service
    #[error("Network error: {0}")]
    Network(String),

    /// External service answered with something we could not understand
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Trivia payload failed validation
    #[error("Invalid trivia: {0}")]
    InvalidTrivia(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl CupidError {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an invalid trivia error
    pub fn invalid_trivia(msg: impl Into<String>) -> Self {
        Self::InvalidTrivia(msg.into())
    }
}
