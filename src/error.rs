//! Error types for imgdrop.

use thiserror::Error;

/// Common error type for imgdrop.
#[derive(Error, Debug)]
pub enum ImgdropError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input or configuration values.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for ImgdropError {
    fn from(e: sqlx::Error) -> Self {
        ImgdropError::Database(e.to_string())
    }
}

/// Result type alias for imgdrop operations.
pub type Result<T> = std::result::Result<T, ImgdropError>;
