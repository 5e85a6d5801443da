//! Error types for plaza.

use thiserror::Error;

/// Common error type for plaza.
#[derive(Error, Debug)]
pub enum PlazaError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant with their message.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error (missing, invalid or expired credential, bad login).
    #[error("authentication error: {0}")]
    Auth(String),

    /// Permission denied by the authorization guard.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Signup with an email address that is already registered.
    #[error("user already exists: {0}")]
    DuplicateEmail(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for PlazaError {
    fn from(e: sqlx::Error) -> Self {
        PlazaError::Database(e.to_string())
    }
}

/// Result type alias for plaza operations.
pub type Result<T> = std::result::Result<T, PlazaError>;
