//! Error types for cumi-support

use thiserror::Error;

/// The main error type for cumi-support operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Session state errors
    #[error("Session error: {0}")]
    Session(String),

    /// Handoff / agent channel errors
    #[error("Channel error: {0}")]
    Channel(String),

    /// Responder (AI) errors
    #[error("Responder error: {0}")]
    Responder(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for cumi-support operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
